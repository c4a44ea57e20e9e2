//! SQLite storage for roster data.
//!
//! This crate holds everything that touches the database: opening a
//! connection, creating the tables, loading source records, and reading the
//! tables back for rendering.
//!
//! # Architecture
//!
//! - **`store`**: [`Store`], a connection bound to a schema, with generic
//!   `execute` and `query`
//! - **`schema`**: DDL generation for a schema's tables
//! - **`migration`**: idempotent table creation and status
//! - **`loader`**: insert-if-absent loading with per-row outcomes
//! - **`retrieve`**: `SELECT *` of both tables into a [`ResultSet`](roster_core::ResultSet)
//!
//! # Quick start
//!
//! ```no_run
//! use roster_source::{Config, read_rooms, read_students};
//! use roster_sqlite::{Loader, Migration, Store, retrieve};
//!
//! let config = Config::load("config.json").unwrap();
//! let mut store = Store::connect(&config.database).unwrap();
//!
//! Migration::new(&mut store).up().unwrap();
//!
//! let rooms = read_rooms(&config.paths.rooms).unwrap();
//! let students = read_students(&config.paths.students).unwrap();
//! let report = Loader::new(&mut store).load(&rooms, &students).unwrap();
//! println!("{} rooms inserted", report.rooms.inserted);
//!
//! let rs = retrieve(&store).unwrap();
//! println!("{}", roster_core::to_xml(&rs).unwrap());
//! ```
//!
//! # Schemas
//!
//! Table names are prefixed with the schema name (`roster_rooms`,
//! `roster_students`), so several schemas can share one database file.
//! Schema names must be valid SQL identifiers.

mod error;
mod loader;
mod migration;
mod retrieve;
mod schema;
mod store;

pub use error::{Result, SqliteError};
pub use loader::{InsertOutcome, LoadReport, Loader, TableCounts, insert_room, insert_student};
pub use migration::{Migration, MigrationStatus};
pub use retrieve::retrieve;
pub use schema::{generate_schema_sql, rooms_table, students_table};
pub use store::{Column, QueryResult, Store};
