//! Tandem: keep local git working copies and GitHub repositories in step.
//!
//! # Usage
//!
//! ```text
//! tandem config init --owner <login> --src-dir <path> [--default-branch <b>] [--public]
//! tandem config show
//! tandem status [--json]
//! tandem sync [--yes-skip]
//! ```

mod commands;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config::ConfigCommand, status::StatusArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tandem",
    version,
    about = "Reconcile local git working copies with GitHub repositories",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or inspect ~/.tandem/config.yaml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Show every repository pair and what sync would do with it.
    Status(StatusArgs),

    /// Converge local working copies and GitHub repositories.
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Status(args) => args.run(),
        Commands::Sync(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
