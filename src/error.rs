//! Fatal errors for the loading and export surfaces.
//!
//! The merge engine itself never returns these; see `diagnostics` for the
//! recoverable problems it reports instead.

use thiserror::Error;

/// Result type for loading and export operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that stop a load or export.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed JSON document (configuration, metadata or feed).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure in an export writer.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed document with the wrong overall shape.
    #[error("Invalid feed: {0}")]
    InvalidFeed(String),
}
