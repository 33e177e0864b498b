//! Error types for the seeker crate.

use thiserror::Error;

/// Errors that can occur when building or executing queries.
#[derive(Debug, Error)]
pub enum SeekerError {
    /// A `LIKE` pattern could not be compiled.
    #[error("invalid like pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The query backend failed while counting or executing.
    #[error("query backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SeekerError {
    /// Wraps an arbitrary backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        SeekerError::Backend(err.into())
    }
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
