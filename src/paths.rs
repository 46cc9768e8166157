//! Well-known per-user paths and vendor resource resolution.
//!
//! Everything the provisioning flow reads or writes hangs off a single
//! `Paths` value, so tests can point the whole system at temporary
//! directories through the environment overrides.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Overrides the per-user configuration directory (`~/.config/glint`).
pub const CONFIG_HOME_ENV: &str = "GLINT_CONFIG_HOME";

/// Overrides the vendor resource bundle location.
pub const RESOURCE_DIR_ENV: &str = "GLINT_RESOURCE_DIR";

/// Resolved filesystem layout for one provisioning run.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Per-user configuration directory, normally `~/.config/glint`.
    pub config_home: PathBuf,
    /// Read-only vendor bundle shipped with the application, if found.
    pub resource_dir: Option<PathBuf>,
    /// The shell rc file the loader source line goes into.
    pub zshrc: PathBuf,
}

impl Paths {
    /// Resolves the layout from the environment.
    pub fn from_env() -> Result<Self> {
        let config_home = match env::var_os(CONFIG_HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => home_dir()?.join(".config").join("glint"),
        };
        Ok(Self {
            config_home,
            resource_dir: resolve_resource_dir(),
            zshrc: default_zshrc()?,
        })
    }

    /// Builds an explicit layout. Used by tests.
    pub fn new(config_home: PathBuf, resource_dir: Option<PathBuf>, zshrc: PathBuf) -> Self {
        Self {
            config_home,
            resource_dir,
            zshrc,
        }
    }

    /// Current-format state record.
    pub fn state_file(&self) -> PathBuf {
        self.config_home.join("state.json")
    }

    /// Empty completion flag from the newest legacy generation.
    pub fn legacy_complete_flag(&self) -> PathBuf {
        self.config_home.join(".setup_complete")
    }

    /// Bare-integer version file from an older generation.
    pub fn legacy_version_file(&self) -> PathBuf {
        self.config_home.join("config_version")
    }

    /// Comma-separated window geometry file from an older generation.
    pub fn legacy_geometry_file(&self) -> PathBuf {
        self.config_home.join("window_size")
    }

    pub fn zsh_dir(&self) -> PathBuf {
        self.config_home.join("zsh")
    }

    pub fn plugin_dir(&self) -> PathBuf {
        self.zsh_dir().join("plugins")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.zsh_dir().join("bin")
    }

    /// Managed loader sourced from the user's `.zshrc`.
    pub fn loader_file(&self) -> PathBuf {
        self.zsh_dir().join("glint.zsh")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.config_home.join("backups")
    }

    /// Appearance configuration consumed by the terminal engine.
    pub fn engine_config(&self) -> PathBuf {
        self.config_home.join("glint.lua")
    }

    pub fn vendor_plugin_dir(&self) -> Option<PathBuf> {
        self.resource_dir.as_ref().map(|r| r.join("zsh").join("plugins"))
    }

    pub fn vendor_delta_bin(&self) -> Option<PathBuf> {
        self.resource_dir.as_ref().map(|r| r.join("bin").join("delta"))
    }

    pub fn vendor_theme_baseline(&self) -> Option<PathBuf> {
        self.resource_dir.as_ref().map(|r| r.join("glint.lua"))
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("cannot determine home directory")
}

fn default_zshrc() -> Result<PathBuf> {
    if let Some(zdotdir) = env::var_os("ZDOTDIR") {
        Ok(PathBuf::from(zdotdir).join(".zshrc"))
    } else {
        Ok(home_dir()?.join(".zshrc"))
    }
}

/// Locates the read-only vendor bundle. The environment override wins;
/// after that, the candidates mirror where the application installs its
/// resources.
fn resolve_resource_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(RESOURCE_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }

    let mut candidates = Vec::new();
    if let Ok(exe) = env::current_exe() {
        if let Some(contents_dir) = exe.parent().and_then(|p| p.parent()) {
            candidates.push(contents_dir.join("Resources"));
        }
    }
    candidates.push(PathBuf::from("/Applications/Glint.app/Contents/Resources"));
    if let Some(home) = dirs::home_dir() {
        candidates.push(
            home.join("Applications")
                .join("Glint.app")
                .join("Contents")
                .join("Resources"),
        );
    }

    candidates.into_iter().find(|p| p.is_dir())
}
