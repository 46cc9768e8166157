//! Login shell resolution and process hand-off.

use std::env;
use std::ffi::{CStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Source of the current user's registered login shell.
pub trait AccountSource {
    fn login_shell(&self) -> Option<PathBuf>;
}

/// Platform account machinery: the directory service first (macOS), then
/// the account database.
pub struct SystemAccounts;

impl AccountSource for SystemAccounts {
    fn login_shell(&self) -> Option<PathBuf> {
        directory_service_shell().or_else(account_database_shell)
    }
}

#[cfg(target_os = "macos")]
fn directory_service_shell() -> Option<PathBuf> {
    let user = env::var("USER").ok()?;
    let output = Command::new("dscl")
        .args([".", "-read", &format!("/Users/{user}"), "UserShell"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("UserShell:"))
        .map(|shell| PathBuf::from(shell.trim()))
}

#[cfg(not(target_os = "macos"))]
fn directory_service_shell() -> Option<PathBuf> {
    None
}

fn account_database_shell() -> Option<PathBuf> {
    // SAFETY: getpwuid returns a pointer into static storage owned by
    // libc; the shell string is copied out before any other call.
    unsafe {
        let pw = libc::getpwuid(libc::getuid());
        if pw.is_null() || (*pw).pw_shell.is_null() {
            return None;
        }
        let bytes = CStr::from_ptr((*pw).pw_shell).to_bytes();
        if bytes.is_empty() {
            return None;
        }
        Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
    }
}

/// Picks the interactive shell to hand control to. Deterministic given
/// the environment value and the account source: `$SHELL` wins when it
/// names an executable file, then the registered shell, then `/bin/zsh`
/// with `/bin/bash` as the secondary default.
pub fn resolve_login_shell(env_shell: Option<OsString>, accounts: &dyn AccountSource) -> PathBuf {
    if let Some(shell) = env_shell {
        let path = PathBuf::from(shell);
        if is_executable(&path) {
            return path;
        }
        debug!("$SHELL={} is not executable, ignoring", path.display());
    }

    if let Some(shell) = accounts.login_shell() {
        if is_executable(&shell) {
            return shell;
        }
    }

    if is_executable(Path::new("/bin/zsh")) {
        PathBuf::from("/bin/zsh")
    } else {
        PathBuf::from("/bin/bash")
    }
}

pub(crate) fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Replaces this process with the requested command, or with the resolved
/// login shell when no command was given. Nothing runs after a successful
/// exec, so all provisioning output is flushed first.
#[cfg(not(tarpaulin_include))]
pub fn hand_off(command: &[String]) -> Result<()> {
    io::stdout().flush().context("flush stdout")?;
    io::stderr().flush().ok();

    let err = if command.is_empty() {
        let shell = resolve_login_shell(env::var_os("SHELL"), &SystemAccounts);
        Command::new(&shell).arg("-l").exec()
    } else {
        Command::new(&command[0]).args(&command[1..]).exec()
    };

    // exec only returns on failure.
    bail!("failed to hand off to shell: {err}")
}
