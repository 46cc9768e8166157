//! Tests for the shell-plugin installer.

use std::fs;

use glint_setup::install::plugins::{PluginInstaller, PLUGINS};
use glint_setup::install::{InstallError, InstallMode};
use glint_setup::Paths;
use tempfile::TempDir;

fn vendor_with_plugins(tmp: &TempDir) -> Paths {
    let resources = tmp.path().join("resources");
    for name in PLUGINS {
        let dir = resources.join("zsh").join("plugins").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.zsh")), "# plugin body\n").unwrap();
        fs::create_dir_all(dir.join("highlighters")).unwrap();
        fs::write(dir.join("highlighters").join("main.zsh"), "# nested\n").unwrap();
    }
    Paths::new(
        tmp.path().join("glint"),
        Some(resources),
        tmp.path().join(".zshrc"),
    )
}

#[test]
fn fresh_install_copies_all_plugin_trees() {
    let tmp = TempDir::new().unwrap();
    let paths = vendor_with_plugins(&tmp);

    let report = PluginInstaller::new(&paths)
        .install(InstallMode::Fresh)
        .unwrap();

    for name in PLUGINS {
        let dir = paths.plugin_dir().join(name);
        assert!(dir.join(format!("{name}.zsh")).is_file(), "plugin {name}");
        assert!(dir.join("highlighters").join("main.zsh").is_file());
    }
    assert_eq!(report.applied.iter().filter(|a| a.contains("installed")).count(), PLUGINS.len());
}

#[test]
fn existing_plugin_directory_is_never_overwritten() {
    let tmp = TempDir::new().unwrap();
    let paths = vendor_with_plugins(&tmp);
    let existing = paths.plugin_dir().join(PLUGINS[0]);
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("user-patched.zsh"), "# local edit\n").unwrap();

    let report = PluginInstaller::new(&paths)
        .install(InstallMode::Update)
        .unwrap();

    // Presence counts as installed regardless of content drift.
    assert!(existing.join("user-patched.zsh").is_file());
    assert!(!existing.join(format!("{}.zsh", PLUGINS[0])).exists());
    assert!(report
        .skipped
        .iter()
        .any(|s| s.contains("already installed")));
}

#[test]
fn reinstall_is_a_no_op_for_plugins() {
    let tmp = TempDir::new().unwrap();
    let paths = vendor_with_plugins(&tmp);
    let installer = PluginInstaller::new(&paths);

    installer.install(InstallMode::Fresh).unwrap();
    let report = installer.install(InstallMode::Update).unwrap();

    assert!(!report.applied.iter().any(|a| a.contains("added")));
    assert_eq!(
        report
            .skipped
            .iter()
            .filter(|s| s.contains("already installed"))
            .count(),
        PLUGINS.len()
    );
}

#[test]
fn loader_is_written_and_orders_syntax_highlighting_last() {
    let tmp = TempDir::new().unwrap();
    let paths = vendor_with_plugins(&tmp);

    PluginInstaller::new(&paths)
        .install(InstallMode::Fresh)
        .unwrap();

    let loader = fs::read_to_string(paths.loader_file()).unwrap();
    let autosuggest = loader.find("zsh-autosuggestions").unwrap();
    let highlighting = loader.find("zsh-syntax-highlighting").unwrap();
    assert!(autosuggest < highlighting);
    assert!(loader.contains("export PATH"));
}

#[test]
fn zshrc_gets_exactly_one_source_line() {
    let tmp = TempDir::new().unwrap();
    let paths = vendor_with_plugins(&tmp);
    fs::write(&paths.zshrc, "# existing rc\nalias ll='ls -l'\n").unwrap();
    let installer = PluginInstaller::new(&paths);

    installer.install(InstallMode::Fresh).unwrap();
    installer.install(InstallMode::Update).unwrap();

    let rc = fs::read_to_string(&paths.zshrc).unwrap();
    assert!(rc.starts_with("# existing rc\n"));
    assert_eq!(
        rc.lines()
            .filter(|l| l.contains("zsh/glint.zsh"))
            .count(),
        1
    );
}

#[test]
fn missing_vendor_bundle_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let paths = Paths::new(
        tmp.path().join("glint"),
        None,
        tmp.path().join(".zshrc"),
    );

    let err = PluginInstaller::new(&paths)
        .install(InstallMode::Fresh)
        .unwrap_err();
    assert!(matches!(err, InstallError::MissingResource(_)));
}
