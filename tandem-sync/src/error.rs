//! Error types for tandem-sync.

use thiserror::Error;

use tandem_core::InventoryError;

/// All errors that can abort the convergence of a pair.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A local or GitHub collaborator call failed.
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// The decider answered with a value no offered choice carries.
    #[error("unexpected decision '{0}'")]
    Decision(String),

    /// The decision prompt itself failed (closed terminal, I/O).
    #[error("prompt failed: {0}")]
    Prompt(String),
}
