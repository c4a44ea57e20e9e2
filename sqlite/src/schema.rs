//! SQL schema generation for the roster tables.
//!
//! A schema is a named group of tables. SQLite has no `CREATE SCHEMA`, so the
//! schema name is used as a table prefix: schema `roster` owns
//! `roster_rooms` and `roster_students`. Several schemas can therefore live
//! side by side in one database file.
//!
//! # Table structure
//!
//! - `{schema}_rooms`: `id` (primary key), `name`
//! - `{schema}_students`: `id` (primary key), `name`, `birthday` (`DATE`),
//!   `sex` (`CHAR(1)`, at most one character), `room_id` (foreign key to
//!   `{schema}_rooms.id`)
//!
//! SQLite does not enforce declared lengths, so `sex` carries an explicit
//! `CHECK`.

use crate::error::{Result, SqliteError};

/// Validates that a schema name is usable as an SQL identifier prefix.
pub(crate) fn validate_schema(schema: &str) -> Result<()> {
    let mut chars = schema.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidSchema(schema.to_string()));
    }
    Ok(())
}

/// Name of the rooms table in `schema`.
pub fn rooms_table(schema: &str) -> String {
    format!("{schema}_rooms")
}

/// Name of the students table in `schema`.
pub fn students_table(schema: &str) -> String {
    format!("{schema}_students")
}

/// Generates the DDL for the rooms and students tables.
///
/// Every statement is `IF NOT EXISTS`, so the script can be run repeatedly.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidSchema`] if the schema name is not a valid
/// identifier.
pub fn generate_schema_sql(schema: &str) -> Result<String> {
    validate_schema(schema)?;

    let rooms = rooms_table(schema);
    let students = students_table(schema);
    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {rooms} (
    id INTEGER PRIMARY KEY,
    name TEXT
);

CREATE TABLE IF NOT EXISTS {students} (
    id INTEGER PRIMARY KEY,
    name TEXT,
    birthday DATE,
    sex CHAR(1) CHECK (sex IS NULL OR length(sex) = 1),
    room_id INTEGER,
    FOREIGN KEY (room_id) REFERENCES {rooms}(id)
);

CREATE INDEX IF NOT EXISTS idx_{students}_room ON {students}(room_id);
"#
    );

    Ok(sql)
}
