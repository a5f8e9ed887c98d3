//! Error types for catalog loading and sizing calculations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while computing a profile or recommendation.
///
/// `Validation` and `NotFound` are client-actionable and carry a message that
/// is safe to show to the caller. `Internal` is never shown verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SizingError {
    /// Returns `true` for errors the caller can fix by changing its input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

/// Failures raised while loading the catalog tables from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("cannot read catalog file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog file {} must contain a JSON object keyed by id", path.display())]
    NotAnObject { path: PathBuf },

    #[error("record `{id}` in {} is not a JSON object", path.display())]
    BadRecord { path: PathBuf, id: String },
}
