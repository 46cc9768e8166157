//! Environment provisioning for the Glint terminal.
//!
//! Runs once per new top-level terminal window: onboards fresh profiles,
//! migrates stale ones to the current configuration version, and hands
//! execution off to the user's login shell.

pub mod install;
pub mod paths;
pub mod provision;
pub mod shell;
pub mod state;

pub use paths::Paths;
pub use provision::changelog::CURRENT_CONFIG_VERSION;
pub use state::{StateStore, VersionState};
