//! Provisioning orchestration: first-run onboarding and versioned updates.
//!
//! The run is strictly sequential. Installer failures degrade to warnings
//! with a retry hint; the recorded version always moves forward so the
//! same failure cannot re-trigger the full prompt sequence on every
//! launch. Version persistence happens synchronously before hand-off -
//! the drop guard and SIGINT handler exist only for abnormal termination.

pub mod changelog;
pub mod prompt;

use std::env;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::install::difftool::{resolve_on_path, DiffToolInstaller, GitConfig};
use crate::install::plugins::PluginInstaller;
use crate::install::theme::ThemeInstaller;
use crate::install::{InstallError, InstallMode, Report};
use crate::paths::Paths;
use crate::state::StateStore;

use changelog::{announce, CURRENT_CONFIG_VERSION};
use prompt::Prompter;

/// What a provisioning run has to do for a recorded version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    UpToDate,
    FirstRun,
    Update { from: u32 },
}

/// The steady-state fast path: already current, or a profile whose only
/// trace is the newest-generation completion flag.
pub fn decide(recorded: u32, completion_flag: bool) -> Decision {
    if recorded >= CURRENT_CONFIG_VERSION {
        Decision::UpToDate
    } else if recorded == 0 && completion_flag {
        Decision::UpToDate
    } else if recorded == 0 {
        Decision::FirstRun
    } else {
        Decision::Update { from: recorded }
    }
}

pub struct Provisioner<'a> {
    paths: &'a Paths,
    store: StateStore,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Provisioner<'a> {
    pub fn new(paths: &'a Paths, prompter: &'a mut dyn Prompter) -> Self {
        Self {
            paths,
            store: StateStore::new(paths),
            prompter,
        }
    }

    pub fn run(&mut self, update_only: bool) -> Result<()> {
        let recorded = self.store.read_version();

        if update_only {
            // Explicit tool invocation, not a terminal start: refresh the
            // integration regardless of the recorded version.
            return self.refresh(recorded);
        }

        match decide(recorded, self.paths.legacy_complete_flag().exists()) {
            Decision::UpToDate => {
                debug!("version {recorded} is current, nothing to do");
                Ok(())
            }
            Decision::FirstRun => self.first_run(),
            Decision::Update { from } => self.update(from),
        }
    }

    fn first_run(&mut self) -> Result<()> {
        self.arm_sigint_net();
        let guard = PersistGuard::new(self.store.clone());

        println!("Welcome to Glint! Let's set up your shell environment.");
        println!();

        if self.prompter.confirm(
            "Install shell plugins (autosuggestions, history search, syntax highlighting)?",
            true,
        )? {
            report_step(
                "shell plugins",
                PluginInstaller::new(self.paths).install(InstallMode::Fresh),
            );
        } else {
            skip_hint("shell plugins");
        }

        if self
            .prompter
            .confirm("Apply the Glint color theme to your terminal config?", true)?
        {
            report_step(
                "color theme",
                ThemeInstaller::new(self.paths, 0).install(InstallMode::Fresh),
            );
        } else {
            skip_hint("color theme");
        }

        if self
            .prompter
            .confirm("Install delta, a syntax-highlighting pager for git diffs?", true)?
        {
            report_step(
                "diff tool",
                DiffToolInstaller::new(self.paths).install(InstallMode::Fresh, &GitConfig),
            );
        } else {
            skip_hint("diff tool");
        }

        // Unconditional: a failed or declined step must never cause the
        // full onboarding flow to come back on the next launch.
        self.store
            .persist(CURRENT_CONFIG_VERSION, None)
            .context("persist provisioning state")?;
        guard.disarm();

        println!("Setup complete. Enjoy Glint!");
        Ok(())
    }

    fn update(&mut self, from: u32) -> Result<()> {
        self.arm_sigint_net();
        let guard = PersistGuard::new(self.store.clone());

        println!("Glint has been updated. What's new:");
        println!();
        for item in announce(from, CURRENT_CONFIG_VERSION) {
            println!("  • {item}");
        }
        println!();

        if !self
            .prompter
            .confirm("Apply the update to your shell environment now?", true)?
        {
            println!("Keeping your current setup. Apply any time with `glint-setup run --update-only`.");
            self.store
                .persist(CURRENT_CONFIG_VERSION, None)
                .context("persist provisioning state")?;
            guard.disarm();
            return Ok(());
        }

        report_step(
            "shell plugins",
            PluginInstaller::new(self.paths).install(InstallMode::Update),
        );

        if resolve_on_path("delta", env::var_os("PATH").as_deref()).is_none()
            && self.prompter.confirm(
                "delta (git diff pager) is not on your PATH. Install the bundled copy?",
                true,
            )?
        {
            report_step(
                "diff tool",
                DiffToolInstaller::new(self.paths).install(InstallMode::Update, &GitConfig),
            );
        }

        self.store
            .persist(CURRENT_CONFIG_VERSION, None)
            .context("persist provisioning state")?;
        guard.disarm();

        println!("Update applied.");
        Ok(())
    }

    /// Non-interactive integration refresh; used by tooling and as the
    /// retry path for failed steps. Every pass here is idempotent.
    fn refresh(&mut self, recorded: u32) -> Result<()> {
        report_step(
            "shell plugins",
            PluginInstaller::new(self.paths).install(InstallMode::Update),
        );
        report_step(
            "color theme",
            ThemeInstaller::new(self.paths, recorded).install(InstallMode::Update),
        );
        report_step(
            "diff tool",
            DiffToolInstaller::new(self.paths).install(InstallMode::Update, &GitConfig),
        );
        self.store
            .persist(CURRENT_CONFIG_VERSION, None)
            .context("persist provisioning state")?;
        Ok(())
    }

    /// Abnormal-termination net: record forward progress on SIGINT so an
    /// interrupted run is not re-prompted from scratch.
    fn arm_sigint_net(&self) {
        let store = self.store.clone();
        if let Err(err) = ctrlc::set_handler(move || {
            let _ = store.persist(CURRENT_CONFIG_VERSION, None);
            std::process::exit(130);
        }) {
            debug!("SIGINT handler not installed: {err}");
        }
    }
}

/// Prints an installer's outcome; failures become warnings with a manual
/// retry hint and never abort the run.
fn report_step(label: &str, result: Result<Report, InstallError>) {
    match result {
        Ok(report) => {
            for line in &report.applied {
                println!("  + {line}");
            }
            for line in &report.skipped {
                println!("  - {line}");
            }
        }
        Err(err) => {
            warn!("{label} step failed: {err}");
            println!("warning: {label} setup failed: {err}");
            println!("         retry later with `glint-setup run --update-only`");
        }
    }
}

fn skip_hint(label: &str) {
    println!("Skipped {label}. Install later with `glint-setup run --update-only`.");
}

/// Last-resort persistence for paths that unwind before the normal write.
struct PersistGuard {
    store: Option<StateStore>,
}

impl PersistGuard {
    fn new(store: StateStore) -> Self {
        Self { store: Some(store) }
    }

    fn disarm(mut self) {
        self.store = None;
    }
}

impl Drop for PersistGuard {
    fn drop(&mut self) {
        if let Some(store) = self.store.take() {
            let _ = store.persist(CURRENT_CONFIG_VERSION, None);
        }
    }
}
