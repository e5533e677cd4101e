//! Error types for lm-ssrs

use thiserror::Error;

/// SSRS extraction error type
#[derive(Error, Debug)]
pub enum SsrsError {
    /// R001: Report definition XML failed to parse
    #[error("[R001] Report definition parse error in {name}: {message}")]
    DefinitionParse { name: String, message: String },
}

/// Result type alias for SsrsError
pub type SsrsResult<T> = Result<T, SsrsError>;
