//! Persisted provisioning state.
//!
//! One JSON record per user profile tracks the configuration version the
//! profile was last provisioned at. Older single-purpose marker files are
//! folded into the record the first time it is written, then deleted.

mod geometry;

use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::paths::Paths;

pub use geometry::{parse_legacy_geometry, WindowGeometry};

/// Persisted per-profile record. `config_version` is monotonically
/// non-decreasing across writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionState {
    pub config_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_geometry: Option<WindowGeometry>,
}

/// Reads and writes the state record at its well-known path.
#[derive(Debug, Clone)]
pub struct StateStore {
    paths: Paths,
}

impl StateStore {
    pub fn new(paths: &Paths) -> Self {
        Self {
            paths: paths.clone(),
        }
    }

    /// Loads the current-format record. A missing or unparsable file is a
    /// fresh profile, never an error.
    pub fn read(&self) -> VersionState {
        let path = self.paths.state_file();
        let Ok(raw) = fs::read_to_string(&path) else {
            return VersionState::default();
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                warn!("unparsable state record {}: {err}", path.display());
                VersionState::default()
            }
        }
    }

    /// Best available recorded version: the current-format record wins
    /// over the legacy bare-integer file; 0 means fresh.
    pub fn read_version(&self) -> u32 {
        if self.paths.state_file().exists() {
            return self.read().config_version;
        }
        let legacy = self.paths.legacy_version_file();
        if let Ok(raw) = fs::read_to_string(&legacy) {
            if let Ok(version) = raw.trim().parse::<u32>() {
                debug!("recorded version {version} from legacy file");
                return version;
            }
            warn!("unparsable legacy version file {}", legacy.display());
        }
        0
    }

    /// Writes the record and consumes any legacy artifacts.
    ///
    /// Idempotent: the same version and geometry produce byte-identical
    /// file content. Geometry preference order is explicit argument, then
    /// whatever the record already holds, then the legacy geometry file.
    /// The version never moves backwards.
    pub fn persist(&self, version: u32, geometry: Option<WindowGeometry>) -> Result<()> {
        let recorded = self.read();
        let state = VersionState {
            config_version: version.max(self.read_version()),
            window_geometry: geometry
                .or(recorded.window_geometry)
                .or_else(|| self.legacy_geometry()),
        };

        fs::create_dir_all(&self.paths.config_home).with_context(|| {
            format!(
                "cannot create config directory {}",
                self.paths.config_home.display()
            )
        })?;

        let mut body = serde_json::to_string_pretty(&state).context("encode state record")?;
        body.push('\n');

        // Rename keeps concurrent launches from ever observing a torn file.
        let target = self.paths.state_file();
        let tmp = self.paths.config_home.join("state.json.tmp");
        fs::write(&tmp, &body).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &target).with_context(|| format!("rename into {}", target.display()))?;
        debug!("persisted version {}", state.config_version);

        self.remove_legacy_artifacts();
        Ok(())
    }

    fn legacy_geometry(&self) -> Option<WindowGeometry> {
        let raw = fs::read_to_string(self.paths.legacy_geometry_file()).ok()?;
        parse_legacy_geometry(&raw)
    }

    /// Legacy files are one-time inputs; once the record exists they are
    /// deleted and must never reappear.
    fn remove_legacy_artifacts(&self) {
        for path in [
            self.paths.legacy_version_file(),
            self.paths.legacy_geometry_file(),
            self.paths.legacy_complete_flag(),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => debug!("removed legacy artifact {}", path.display()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => warn!("cannot remove legacy artifact {}: {err}", path.display()),
            }
        }
    }
}
