//! Configuration and source file loading for roster.
//!
//! This crate reads the two inputs of a roster run: the [`Config`] document
//! (database settings plus source file paths) and the flat JSON arrays of
//! rooms and students those paths point to.
//!
//! # Quick start
//!
//! ```no_run
//! use roster_source::{Config, read_rooms, read_students};
//!
//! let config = Config::load("config.json").unwrap();
//! let rooms = read_rooms(&config.paths.rooms).unwrap();
//! let students = read_students(&config.paths.students).unwrap();
//! println!("{} rooms, {} students", rooms.len(), students.len());
//! ```

mod config;
mod error;
mod reader;

pub use config::{Config, DEFAULT_SCHEMA, DatabaseConfig, PathsConfig};
pub use error::{Result, SourceError};
pub use reader::{read_json_array, read_rooms, read_students};
