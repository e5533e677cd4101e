//! Error types for lm-catalog

use thiserror::Error;

/// Catalog access error type
#[derive(Error, Debug)]
pub enum CatalogError {
    /// C001: Snapshot file failed to parse
    #[error("[C001] Snapshot parse error in {path}: {source}")]
    SnapshotParse {
        path: String,
        source: serde_json::Error,
    },

    /// C002: IO error
    #[error("[C002] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C003: Client-specific failure
    #[error("[C003] Catalog client error: {0}")]
    Client(String),
}

/// Result type alias for CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
