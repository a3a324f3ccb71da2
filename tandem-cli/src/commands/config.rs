//! `tandem config`: create and show `~/.tandem/config.yaml`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use tandem_core::config::{config_path_at, init_at, load_at};
use tandem_core::{Owner, Settings};

use super::home;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a config file unless one already exists.
    Init(InitArgs),

    /// Print the stored settings as YAML.
    Show,
}

/// Arguments for `tandem config init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// GitHub login owning the managed repositories.
    #[arg(long)]
    pub owner: String,

    /// Directory scanned for working copies.
    #[arg(long)]
    pub src_dir: PathBuf,

    /// Branch every repository is expected to sit on.
    #[arg(long)]
    pub default_branch: Option<String>,

    /// Create uploaded repositories as public.
    #[arg(long)]
    pub public: bool,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    let home = home()?;
    match command {
        ConfigCommand::Init(args) => {
            let path = config_path_at(&home);
            let existed = path.exists();

            let src_dir = std::path::absolute(&args.src_dir).unwrap_or(args.src_dir);
            let mut settings = Settings::new(Owner::from(args.owner), src_dir);
            if let Some(branch) = args.default_branch {
                settings.default_branch = branch;
            }
            settings.private = !args.public;

            init_at(&home, settings).context("failed to initialize config")?;
            if existed {
                println!("✓ config already exists at {} (unchanged)", path.display());
            } else {
                println!("✓ wrote {}", path.display());
            }
        }
        ConfigCommand::Show => {
            let settings = load_at(&home).context("no config; run `tandem config init` first")?;
            let yaml = serde_yaml::to_string(&settings).context("failed to serialize settings")?;
            print!("{yaml}");
        }
    }
    Ok(())
}
