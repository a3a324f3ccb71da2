//! tandem core library: domain types, settings persistence, collaborator
//! contracts, errors.
//!
//! - [`types`]: records, pairs and newtypes
//! - [`config`]: load / save / init of `~/.tandem/config.yaml`
//! - [`identity`]: alias sets and the same-repository relation
//! - [`github_url`]: GitHub URL parsing and the canonical remote URL
//! - [`inventory`]: [`LocalInventory`] and [`RemoteInventory`] traits
//! - [`error`]: [`ConfigError`], [`InventoryError`]

pub mod config;
pub mod error;
pub mod github_url;
pub mod identity;
pub mod inventory;
pub mod types;

pub use config::{RemoteRule, Settings};
pub use error::{ConfigError, InventoryError};
pub use inventory::{LocalInventory, OnEach, RemoteInventory};
pub use types::{
    normalize_topics, AliasSet, LocalRepo, Owner, PairKind, RemoteRepo, RemoteSet, RepoId, RepoMeta,
    RepoName, RepoPair, WorkingStatus,
};
