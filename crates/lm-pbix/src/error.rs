//! Error types for lm-pbix

use thiserror::Error;

/// Power BI extraction error type
#[derive(Error, Debug)]
pub enum PbixError {
    /// P001: Report folder missing an expected file
    #[error("[P001] File not found: {path}")]
    FileNotFound { path: String },

    /// P002: Connections.json failed to parse
    #[error("[P002] Connections parse error in {path}: {source}")]
    ConnectionsParse {
        path: String,
        source: serde_json::Error,
    },

    /// P003: Archive extraction failure
    #[error("[P003] Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// P004: IO error
    #[error("[P004] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// P005: IO error with file path context
    #[error("[P005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for PbixError
pub type PbixResult<T> = Result<T, PbixError>;
