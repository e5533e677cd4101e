//! Error types for lm-ssis

use thiserror::Error;

/// SSIS extraction error type
#[derive(Error, Debug)]
pub enum SsisError {
    /// S001: Package file missing from the export directory
    #[error("[S001] Package file not found: {path}")]
    PackageNotFound { path: String },

    /// S002: DTSX/conmgr XML failed to parse
    #[error("[S002] XML parse error in {path}: {message}")]
    XmlParse { path: String, message: String },

    /// S003: Archive extraction failure
    #[error("[S003] Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// S004: IO error
    #[error("[S004] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// S005: IO error with file path context
    #[error("[S005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for SsisError
pub type SsisResult<T> = Result<T, SsisError>;
