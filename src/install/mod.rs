//! Feature installers.
//!
//! Every installer is idempotent and safe to re-invoke; callers downgrade
//! failures to warnings so one broken step never blocks the rest of a
//! provisioning run.

pub mod difftool;
pub mod plugins;
pub mod theme;

use std::fs;
use std::path::{Path, PathBuf};

/// Whether an installer runs during first-run onboarding or an update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    Fresh,
    Update,
}

/// What an installer changed and what it deliberately left alone.
#[derive(Debug, Default)]
pub struct Report {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

impl Report {
    pub fn applied(&mut self, msg: impl Into<String>) {
        self.applied.push(msg.into());
    }

    pub fn skipped(&mut self, msg: impl Into<String>) {
        self.skipped.push(msg.into());
    }
}

/// Errors from a single installer step.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("vendor resource not found: {0}")]
    MissingResource(&'static str),

    #[error("{path}: does not end with a trailing `return config` statement; left untouched")]
    UnexpectedShape { path: PathBuf },

    #[error("git: {0}")]
    Tool(String),

    #[error("failed to {action} {path}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Overwrite policy for artifacts this system wrote in the past.
///
/// An artifact is only rewritten silently when the recorded version proves
/// the last writer was the provisioning system itself; any other recorded
/// version means the user may have modified it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    NotOwned,
    OwnedAtVersion(u32),
}

impl OwnershipPolicy {
    pub fn permits(self, recorded_version: u32) -> bool {
        match self {
            OwnershipPolicy::NotOwned => false,
            OwnershipPolicy::OwnedAtVersion(v) => v == recorded_version,
        }
    }
}

/// Copies a directory tree. Symlinks are followed; the vendor bundles this
/// is used on do not contain any.
pub(crate) fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dst).map_err(|e| InstallError::io("create", dst, e))?;
    let entries = fs::read_dir(src).map_err(|e| InstallError::io("read", src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| InstallError::io("read", src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| InstallError::io("inspect", &from, e))?;
        if file_type.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| InstallError::io("copy", &from, e))?;
        }
    }
    Ok(())
}
