pub mod config;
pub mod status;
pub mod sync;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tandem_core::config::load_at;
use tandem_core::{ConfigError, Owner, Settings};
use tandem_github::GithubInventory;
use tandem_local::GitInventory;

/// Home directory holding `.tandem/`.
pub fn home() -> Result<PathBuf> {
    Ok(dirs::home_dir().ok_or(ConfigError::HomeNotFound)?)
}

/// Drive `future` to completion on a fresh multi-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Settings overrides shared by commands that talk to both sources.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// GitHub token; read from GITHUB_TOKEN when omitted.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub login owning the managed repositories.
    #[arg(long, env = "TANDEM_OWNER")]
    pub owner: Option<String>,

    /// Directory scanned for working copies.
    #[arg(long, env = "TANDEM_SRC_DIR")]
    pub src_dir: Option<PathBuf>,

    /// GitHub API root.
    #[arg(long, env = "TANDEM_API_BASE", hide = true)]
    pub api_base: Option<String>,
}

impl SourceArgs {
    /// Stored settings with command-line overrides applied.
    ///
    /// Without a config file, `--owner` and `--src-dir` are enough.
    pub fn settings(&self) -> Result<Settings> {
        let home = home()?;
        let mut settings = match load_at(&home) {
            Ok(settings) => settings,
            Err(ConfigError::NotFound { .. }) if self.owner.is_some() && self.src_dir.is_some() => {
                Settings::default()
            }
            Err(e) => {
                return Err(e).context("failed to load settings; run `tandem config init` first")
            }
        };
        if let Some(owner) = &self.owner {
            settings.owner = Owner::from(owner.as_str());
        }
        if let Some(src_dir) = &self.src_dir {
            settings.src_dir = src_dir.clone();
        }
        if let Some(api_base) = &self.api_base {
            settings.api_base = api_base.clone();
        }
        settings.validate().context("invalid settings")?;
        Ok(settings)
    }

    pub fn inventories(&self, settings: &Settings) -> (GitInventory, GithubInventory) {
        let local = GitInventory::new(&settings.src_dir);
        let remote = GithubInventory::new(
            &settings.api_base,
            self.token.clone(),
            settings.owner.clone(),
            settings.private,
        );
        (local, remote)
    }
}
