//! Tests for the ownership-gated theme installer.

use std::fs;

use glint_setup::install::theme::{apply_theme_patch, ThemeInstaller};
use glint_setup::install::{InstallError, InstallMode};
use glint_setup::Paths;
use tempfile::TempDir;

const BASELINE: &str = "local config = {}\nconfig.font_size = 14\n\nreturn config\n";

fn paths_with_baseline(tmp: &TempDir, baseline: &str) -> Paths {
    let resources = tmp.path().join("resources");
    fs::create_dir_all(&resources).unwrap();
    fs::write(resources.join("glint.lua"), baseline).unwrap();
    let paths = Paths::new(
        tmp.path().join("glint"),
        Some(resources),
        tmp.path().join(".zshrc"),
    );
    fs::create_dir_all(&paths.config_home).unwrap();
    paths
}

fn backup_count(paths: &Paths) -> usize {
    match fs::read_dir(paths.backup_dir()) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[test]
fn fresh_destination_gets_the_patched_baseline() {
    let tmp = TempDir::new().unwrap();
    let paths = paths_with_baseline(&tmp, BASELINE);

    let report = ThemeInstaller::new(&paths, 0)
        .install(InstallMode::Fresh)
        .unwrap();

    let written = fs::read_to_string(paths.engine_config()).unwrap();
    assert_eq!(written, apply_theme_patch(BASELINE).unwrap());
    assert!(written.ends_with("return config\n"));
    assert_eq!(backup_count(&paths), 0);
    assert_eq!(report.applied.len(), 1);
}

#[test]
fn destination_outside_the_ownership_window_is_never_touched() {
    let tmp = TempDir::new().unwrap();
    let paths = paths_with_baseline(&tmp, BASELINE);
    let user_content = "-- my own config\nreturn config\n";
    fs::write(paths.engine_config(), user_content).unwrap();

    // Recorded version 3 is not the version that wrote the theme.
    let report = ThemeInstaller::new(&paths, 3)
        .install(InstallMode::Update)
        .unwrap();

    assert_eq!(
        fs::read_to_string(paths.engine_config()).unwrap(),
        user_content
    );
    assert_eq!(backup_count(&paths), 0);
    assert!(report.applied.is_empty());
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn owned_destination_is_backed_up_then_rewritten() {
    let tmp = TempDir::new().unwrap();
    let paths = paths_with_baseline(&tmp, BASELINE);
    let stale = "local config = {}\nconfig.font_size = 12\nreturn config\n";
    fs::write(paths.engine_config(), stale).unwrap();

    ThemeInstaller::new(&paths, 5)
        .install(InstallMode::Update)
        .unwrap();

    assert_eq!(
        fs::read_to_string(paths.engine_config()).unwrap(),
        apply_theme_patch(BASELINE).unwrap()
    );
    assert_eq!(backup_count(&paths), 1);

    let backup = fs::read_dir(paths.backup_dir())
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(fs::read_to_string(backup.path()).unwrap(), stale);
    assert!(backup
        .file_name()
        .to_string_lossy()
        .starts_with("glint.lua."));
}

#[test]
fn rewriting_identical_content_skips_the_backup() {
    let tmp = TempDir::new().unwrap();
    let paths = paths_with_baseline(&tmp, BASELINE);
    fs::write(paths.engine_config(), apply_theme_patch(BASELINE).unwrap()).unwrap();

    let report = ThemeInstaller::new(&paths, 5)
        .install(InstallMode::Update)
        .unwrap();

    assert_eq!(backup_count(&paths), 0);
    assert!(report.applied.is_empty());
}

#[test]
fn malformed_baseline_fails_closed() {
    let tmp = TempDir::new().unwrap();
    let paths = paths_with_baseline(&tmp, "local config = {}\n-- no return here\n");

    let err = ThemeInstaller::new(&paths, 0)
        .install(InstallMode::Fresh)
        .unwrap_err();

    assert!(matches!(err, InstallError::UnexpectedShape { .. }));
    assert!(!paths.engine_config().exists());
}

#[test]
fn missing_baseline_reports_a_missing_resource() {
    let tmp = TempDir::new().unwrap();
    let paths = Paths::new(
        tmp.path().join("glint"),
        None,
        tmp.path().join(".zshrc"),
    );

    let err = ThemeInstaller::new(&paths, 0)
        .install(InstallMode::Fresh)
        .unwrap_err();
    assert!(matches!(err, InstallError::MissingResource(_)));
}
