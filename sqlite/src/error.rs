//! Error types for roster storage operations.
//!
//! Covers opening the database, running statements, schema setup, and
//! rejecting input that cannot be stored.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// The database could not be opened or is not usable.
    #[error("connection error: cannot use database '{path}': {source}")]
    ConnectionError {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed, including constraint violations.
    #[error("query error: {0}")]
    QueryError(#[from] rusqlite::Error),

    /// An input record could not be converted for storage.
    #[error("parse error: {0}")]
    ParseError(#[source] roster_core::CoreError),

    /// Creating the schema tables failed.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Schema name contains invalid characters.
    #[error(
        "invalid schema name '{0}': must start with a letter or underscore and contain only alphanumeric characters and underscores"
    )]
    InvalidSchema(String),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
