//! Error types for lm-sql

use thiserror::Error;

/// SQL heuristics error type
#[derive(Error, Debug)]
pub enum SqlError {
    /// Empty SQL input
    #[error("Empty SQL statement")]
    EmptySql,

    /// The statement did not parse as SQL
    #[error("SQL parse error: {0}")]
    ParseError(String),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
