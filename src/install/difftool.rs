//! Diff tool installation and git configuration.
//!
//! Two independent phases: copy the vendored `delta` binary into the
//! managed bin directory, and fill in global git options. Options are set
//! key-by-key and only when absent; a user's existing value always wins.

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{InstallError, InstallMode, Report};
use crate::paths::Paths;
use crate::shell::is_executable;

/// Git options applied when unset. The pager selection pairs with the
/// shell integration, which puts the managed bin directory on `PATH`.
pub const GIT_DEFAULTS: &[(&str, &str)] = &[
    ("core.pager", "delta"),
    ("interactive.diffFilter", "delta --color-only"),
    ("delta.navigate", "true"),
    ("delta.pager", "less --mouse --wheel-lines=3 -R -F -X"),
    ("delta.line-numbers", "true"),
    ("delta.side-by-side", "true"),
    ("delta.line-fill-method", "spaces"),
    ("delta.syntax-theme", "Coldark-Dark"),
    ("delta.file-style", "omit"),
    ("delta.file-decoration-style", "omit"),
    ("delta.hunk-header-style", "file line-number syntax"),
];

/// Key-value store for the tool configuration. The real implementation
/// talks to `git config --global`; tests swap in an in-memory fake.
pub trait ConfigStore {
    fn available(&self) -> bool;
    fn get(&self, key: &str) -> Result<Option<String>, InstallError>;
    fn set(&self, key: &str, value: &str) -> Result<(), InstallError>;
}

/// Global git configuration via the `git` binary.
pub struct GitConfig;

impl ConfigStore for GitConfig {
    fn available(&self) -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn get(&self, key: &str) -> Result<Option<String>, InstallError> {
        let output = Command::new("git")
            .args(["config", "--global", "--get", key])
            .output()
            .map_err(|e| InstallError::Tool(format!("query {key}: {e}")))?;
        if output.status.success() {
            Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            ))
        } else if output.status.code() == Some(1) {
            // Exit 1 means the key is unset.
            Ok(None)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(InstallError::Tool(format!(
                "query {key}: {}",
                stderr.trim()
            )))
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), InstallError> {
        let status = Command::new("git")
            .args(["config", "--global", key, value])
            .status()
            .map_err(|e| InstallError::Tool(format!("set {key}: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(InstallError::Tool(format!("set {key}: {status}")))
        }
    }
}

/// Resolves a command name against a `PATH`-style value.
pub fn resolve_on_path(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    env::split_paths(path_var?)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

pub struct DiffToolInstaller<'a> {
    paths: &'a Paths,
}

impl<'a> DiffToolInstaller<'a> {
    pub fn new(paths: &'a Paths) -> Self {
        Self { paths }
    }

    pub fn install(
        &self,
        mode: InstallMode,
        store: &dyn ConfigStore,
    ) -> Result<Report, InstallError> {
        debug!(?mode, "diff tool install pass");
        let mut report = Report::default();
        self.install_binary(&mut report)?;
        self.apply_defaults(store, &mut report)?;
        Ok(report)
    }

    /// A missing vendor binary only skips the copy phase; configuration
    /// still runs.
    fn install_binary(&self, report: &mut Report) -> Result<(), InstallError> {
        let managed = self.paths.bin_dir().join("delta");

        if let Some(found) = resolve_on_path("delta", env::var_os("PATH").as_deref()) {
            if found == managed {
                report.skipped("delta already resolves to the managed copy");
                return Ok(());
            }
            debug!("delta on PATH at {}, refreshing managed copy", found.display());
        }

        let Some(vendor) = self.paths.vendor_delta_bin().filter(|p| p.is_file()) else {
            report.skipped("vendored delta binary missing; copy skipped");
            return Ok(());
        };

        let bin_dir = self.paths.bin_dir();
        fs::create_dir_all(&bin_dir).map_err(|e| InstallError::io("create", &bin_dir, e))?;
        fs::copy(&vendor, &managed).map_err(|e| InstallError::io("copy", &vendor, e))?;
        set_executable(&managed)?;
        report.applied(format!("installed delta to {}", managed.display()));
        Ok(())
    }

    fn apply_defaults(
        &self,
        store: &dyn ConfigStore,
        report: &mut Report,
    ) -> Result<(), InstallError> {
        if !store.available() {
            report.skipped("git not found; configuration skipped");
            return Ok(());
        }

        let mut set_keys = Vec::new();
        for (key, value) in GIT_DEFAULTS {
            if store.get(key)?.is_none() {
                store.set(key, value)?;
                set_keys.push(*key);
            }
        }

        if set_keys.is_empty() {
            report.skipped("git defaults already configured");
        } else {
            report.applied(format!("set git defaults: {}", set_keys.join(", ")));
        }
        Ok(())
    }
}

fn set_executable(path: &std::path::Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| InstallError::io("chmod", path, e))
}
