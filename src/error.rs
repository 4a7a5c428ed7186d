//! Error types for the page behaviors.
//!
//! Neither error ever reaches the user. Storage failures are recovered by
//! the theme manager and config failures fall back to defaults; both are
//! only ever logged.

/// `localStorage` could not be used.
///
/// Covers storage disabled by policy, blocked third-party storage and
/// quota exhaustion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid site config: {0}")]
    Parse(#[from] serde_json::Error),
}
