//! Error types for tandem-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from config persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`; cannot locate `~/.tandem/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// The config parsed but is not usable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Error returned by every inventory collaborator call.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `git` subprocess exited non-zero.
    #[error("`{command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    /// The hosting API answered with a non-success status.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    /// A blocking worker panicked or was cancelled.
    #[error("background task failed: {0}")]
    Join(String),
}

/// Convenience constructor for [`InventoryError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> InventoryError {
    InventoryError::Io {
        path: path.into(),
        source,
    }
}
