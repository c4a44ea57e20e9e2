//! Error types for the roster data model and formatters.

use thiserror::Error;

/// Errors raised while building or rendering roster data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A student's birthday could not be read as a calendar date.
    #[error("invalid birthday '{value}': {reason}")]
    ParseError { value: String, reason: String },

    /// A value has no mapping in the requested output format.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
