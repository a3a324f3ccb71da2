//! Collaborator contracts the reconciliation engine consumes.
//!
//! Every mutating call returns the authoritative post-mutation record, freshly
//! reloaded from the source. Callers replace their copy with it and never
//! patch fields by hand.

use async_trait::async_trait;

use crate::error::InventoryError;
use crate::types::{LocalRepo, RemoteRepo, RemoteSet, RepoMeta};

/// Progress callback invoked once per record while an inventory loads.
pub type OnEach<'a, T> = Option<&'a (dyn Fn(&T) + Send + Sync)>;

/// Git working copies on the local filesystem.
#[async_trait]
pub trait LocalInventory: Send + Sync {
    async fn load_all(&self, on_each: OnEach<'_, LocalRepo>)
        -> Result<Vec<LocalRepo>, InventoryError>;

    /// Clone `clone_url` into a new working copy named after `remote`.
    async fn create(&self, remote: &RemoteRepo, clone_url: &str)
        -> Result<LocalRepo, InventoryError>;

    async fn update_name(&self, repo: &LocalRepo, new_name: &str)
        -> Result<LocalRepo, InventoryError>;

    /// Make the working copy's remotes exactly `remotes`.
    async fn update_remotes(&self, repo: &LocalRepo, remotes: &RemoteSet)
        -> Result<LocalRepo, InventoryError>;

    /// Push the current branch to `origin`, setting upstream.
    async fn update_push(&self, repo: &LocalRepo) -> Result<LocalRepo, InventoryError>;

    async fn remove(&self, repo: &LocalRepo) -> Result<(), InventoryError>;
}

/// Repositories on the hosting service owned by the configured owner.
#[async_trait]
pub trait RemoteInventory: Send + Sync {
    async fn load_all(&self, on_each: OnEach<'_, RemoteRepo>)
        -> Result<Vec<RemoteRepo>, InventoryError>;

    /// Create a hosted repository named after `local`.
    async fn create(&self, local: &LocalRepo) -> Result<RemoteRepo, InventoryError>;

    async fn update_name(&self, repo: &RemoteRepo, new_name: &str)
        -> Result<RemoteRepo, InventoryError>;

    async fn update_meta(&self, repo: &RemoteRepo, meta: &RepoMeta)
        -> Result<RemoteRepo, InventoryError>;

    async fn remove(&self, repo: &RemoteRepo) -> Result<(), InventoryError>;
}
