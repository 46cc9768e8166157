//! glint-setup: first-run provisioning and shell-integration updates for
//! the Glint terminal.
//!
//! The terminal engine invokes `glint-setup run` once per new top-level
//! window; everything else is a utility surface for humans and tooling.

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use glint_setup::provision::changelog::{announce, CURRENT_CONFIG_VERSION};
use glint_setup::provision::prompt::Console;
use glint_setup::provision::Provisioner;
use glint_setup::shell;
use glint_setup::state::StateStore;
use glint_setup::Paths;

/// Version string: `0.3.2 (abc1234 2026-01-15)` in dev builds; the
/// `release` feature drops the git hash for official builds.
fn version_string() -> String {
    let base = env!("CARGO_PKG_VERSION");
    let date = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown");
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) if sha != "unknown" => {
            let short = sha.get(..7).unwrap_or(sha);
            format!("{base} ({short} {date})")
        }
        _ => format!("{base} ({date})"),
    }
}

#[derive(Parser)]
#[command(
    name = "glint-setup",
    version = version_string(),
    about = "Provision and maintain the Glint shell environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the environment, then hand off to the login shell
    Run {
        /// Refresh shell integration without interactive prompts
        #[arg(long)]
        update_only: bool,

        /// Command to hand off to instead of the login shell
        #[arg(trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// Show the recorded and current configuration versions
    Status,
    /// Print the changes introduced between two configuration versions
    Changelog {
        /// Lowest version to exclude (announces strictly newer versions)
        #[arg(long, default_value_t = 0)]
        from: u32,

        /// Highest version to include; defaults to the current version
        #[arg(long)]
        to: Option<u32>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run {
        update_only: false,
        command: Vec::new(),
    }) {
        Commands::Run {
            update_only,
            command,
        } => run(update_only, &command),
        Commands::Status => status(),
        Commands::Changelog { from, to } => {
            for item in announce(from, to.unwrap_or(CURRENT_CONFIG_VERSION)) {
                println!("  • {item}");
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "glint-setup", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(not(tarpaulin_include))]
fn run(update_only: bool, command: &[String]) -> Result<()> {
    let paths = Paths::from_env()?;
    let mut prompter = Console;
    Provisioner::new(&paths, &mut prompter).run(update_only)?;

    if update_only {
        // Tooling invocation: no terminal window is waiting for a shell.
        return Ok(());
    }
    shell::hand_off(command)
}

fn status() -> Result<()> {
    let paths = Paths::from_env()?;
    let recorded = StateStore::new(&paths).read_version();
    println!("recorded version: {recorded}");
    println!("current version:  {CURRENT_CONFIG_VERSION}");
    if recorded >= CURRENT_CONFIG_VERSION {
        println!("Up to date.");
    } else if recorded == 0 {
        println!("Fresh profile; the next launch offers first-run setup.");
    } else {
        let pending = announce(recorded, CURRENT_CONFIG_VERSION).len();
        println!("Update pending ({pending} change entries).");
    }
    Ok(())
}
