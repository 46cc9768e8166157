//! Color theme patch for the terminal engine configuration.
//!
//! The engine config is an opaque Lua script whose last statement returns
//! the configuration object. The patch inserts a managed override block
//! ahead of that statement. Overwrites are gated by the ownership window:
//! outside it the file is presumed user-modified and left untouched.

use std::fs;

use chrono::Local;
use tracing::debug;

use super::{InstallError, InstallMode, OwnershipPolicy, Report};
use crate::paths::Paths;

/// Recorded version whose update pass last rewrote the theme artifact.
pub const THEME_OWNERSHIP: OwnershipPolicy = OwnershipPolicy::OwnedAtVersion(5);

const MARKER_BEGIN: &str = "-- ===== Glint Theme Defaults (managed) =====";
const MARKER_END: &str = "-- ==========================================";
const TRAILING_STATEMENT: &str = "return config";

const THEME_OVERRIDES: &str = r#"config.color_scheme = "Coldark-Dark"
config.window_decorations = "RESIZE"
config.window_background_opacity = 0.96"#;

pub struct ThemeInstaller<'a> {
    paths: &'a Paths,
    recorded_version: u32,
}

impl<'a> ThemeInstaller<'a> {
    pub fn new(paths: &'a Paths, recorded_version: u32) -> Self {
        Self {
            paths,
            recorded_version,
        }
    }

    pub fn install(&self, mode: InstallMode) -> Result<Report, InstallError> {
        debug!(?mode, "theme install pass");
        let mut report = Report::default();

        let baseline_path = self
            .paths
            .vendor_theme_baseline()
            .filter(|p| p.is_file())
            .ok_or(InstallError::MissingResource("engine config baseline"))?;
        let dest = self.paths.engine_config();

        if dest.exists() && !THEME_OWNERSHIP.permits(self.recorded_version) {
            report.skipped(format!(
                "{}: not written by version {}; left untouched",
                dest.display(),
                self.recorded_version
            ));
            return Ok(report);
        }

        let baseline = fs::read_to_string(&baseline_path)
            .map_err(|e| InstallError::io("read", &baseline_path, e))?;
        let patched = apply_theme_patch(&baseline).ok_or(InstallError::UnexpectedShape {
            path: baseline_path,
        })?;

        if dest.exists() {
            let current = fs::read_to_string(&dest).map_err(|e| InstallError::io("read", &dest, e))?;
            if current == patched {
                report.skipped("theme already current");
                return Ok(report);
            }
            let backup = self.back_up(&mut report)?;
            debug!("previous engine config backed up to {}", backup.display());
        }

        fs::create_dir_all(&self.paths.config_home)
            .map_err(|e| InstallError::io("create", &self.paths.config_home, e))?;
        fs::write(&dest, patched).map_err(|e| InstallError::io("write", &dest, e))?;
        report.applied(format!("applied managed theme defaults to {}", dest.display()));
        Ok(report)
    }

    /// Snapshot copy taken immediately before an allowed overwrite.
    /// Backups are never auto-deleted.
    fn back_up(&self, report: &mut Report) -> Result<std::path::PathBuf, InstallError> {
        let backup_dir = self.paths.backup_dir();
        fs::create_dir_all(&backup_dir).map_err(|e| InstallError::io("create", &backup_dir, e))?;
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let backup = backup_dir.join(format!("glint.lua.{stamp}"));
        let dest = self.paths.engine_config();
        fs::copy(&dest, &backup).map_err(|e| InstallError::io("copy", &dest, e))?;
        report.applied(format!("backed up previous config to {}", backup.display()));
        Ok(backup)
    }
}

/// Rebuilds the artifact as baseline-minus-last-statement, the managed
/// override block, then the original trailing statement.
///
/// Returns `None` unless the final non-empty line is exactly
/// `return config` - editing anything else would corrupt user content, so
/// the patch fails closed.
pub fn apply_theme_patch(baseline: &str) -> Option<String> {
    let lines: Vec<&str> = baseline.lines().collect();
    let last = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .filter(|idx| lines[*idx].trim() == TRAILING_STATEMENT)?;

    let mut out: Vec<&str> = lines[..last].to_vec();
    while out.last().is_some_and(|line| line.trim().is_empty()) {
        out.pop();
    }
    out.push("");
    out.push(MARKER_BEGIN);
    for line in THEME_OVERRIDES.lines() {
        out.push(line);
    }
    out.push(MARKER_END);
    out.push("");
    out.push(lines[last]);

    let mut merged = out.join("\n");
    merged.push('\n');
    Some(merged)
}
