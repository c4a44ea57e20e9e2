//! Error types for configuration and source file loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading configuration or source files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file is missing or unreadable.
    #[error("I/O error reading '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not have the expected shape.
    #[error("parse error in '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for results with [`SourceError`].
pub type Result<T> = std::result::Result<T, SourceError>;
