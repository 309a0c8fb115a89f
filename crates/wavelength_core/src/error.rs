//! Error types for catalog loading and shared linker state.
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the core crate.
///
/// Linking itself never fails; these cover the I/O and shared-state edges
/// around it.
#[derive(Error, Debug)]
pub enum LinkerError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid entity at index {index}: {reason}")]
    InvalidEntity { index: usize, reason: String },

    #[error("Catalog cache state is poisoned")]
    CachePoisoned,
}
