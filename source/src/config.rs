//! Run configuration: database settings and source file locations.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "database": {
//!     "host": "localhost",
//!     "dbname": "roster.db",
//!     "user": "admin",
//!     "password": "secret"
//!   },
//!   "paths": {
//!     "students": "data/students.json",
//!     "rooms": "data/rooms.json"
//!   }
//! }
//! ```
//!
//! `dbname` is the SQLite database file. `host`, `user`, and `password` are
//! accepted for compatibility with server-backed deployments and may be
//! omitted. `database.schema` selects the table prefix and defaults to
//! [`DEFAULT_SCHEMA`].

use std::fmt;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};

/// Schema name used when the configuration does not set one.
pub const DEFAULT_SCHEMA: &str = "roster";

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// Database connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub host: String,
    /// Path of the SQLite database file.
    pub dbname: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Name of the schema that owns the roster tables.
    #[serde(default = "default_schema")]
    pub schema: String,
}

impl DatabaseConfig {
    /// Settings for a database file with every other field defaulted.
    pub fn new(dbname: impl Into<String>) -> Self {
        Self {
            host: String::new(),
            dbname: dbname.into(),
            user: String::new(),
            password: String::new(),
            schema: default_schema(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .finish()
    }
}

/// Locations of the JSON source files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub students: PathBuf,
    pub rooms: PathBuf,
}

/// Top-level configuration document.
///
/// # Examples
///
/// ```no_run
/// use roster_source::Config;
///
/// let config = Config::load("config.json").unwrap();
/// println!("rooms come from {}", config.paths.rooms.display());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub paths: PathsConfig,
}

impl Config {
    /// Loads configuration from a JSON file.
    ///
    /// Relative source paths are kept as written and resolve against the
    /// current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::IoError`] if the file cannot be read, or
    /// [`SourceError::ParseError`] if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| SourceError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            SourceError::ParseError {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), database = ?config.database, "loaded configuration");
        Ok(config)
    }
}
