//! Idempotent loading of rooms and students.
//!
//! Every row goes through an explicit insert-if-absent: the primary key is
//! looked up first and the row is only inserted when it is missing. Existing
//! rows are never updated. Each insert reports an [`InsertOutcome`], and a
//! whole load is summarised in a [`LoadReport`].
//!
//! # Example
//!
//! ```
//! use roster_core::{Room, StudentRecord};
//! use roster_sqlite::{Loader, Migration, Store};
//!
//! let mut store = Store::open_in_memory("roster").unwrap();
//! Migration::new(&mut store).up().unwrap();
//!
//! let rooms = vec![Room { id: 1, name: Some("Room A".into()) }];
//! let students = vec![StudentRecord {
//!     id: 10,
//!     name: Some("Alice".into()),
//!     birthday: "2000-05-01T00:00:00".into(),
//!     sex: Some("F".into()),
//!     room: Some(1),
//! }];
//!
//! let first = Loader::new(&mut store).load(&rooms, &students).unwrap();
//! assert_eq!(first.rooms.inserted, 1);
//!
//! let second = Loader::new(&mut store).load(&rooms, &students).unwrap();
//! assert_eq!(second.students.skipped, 1);
//! ```

use roster_core::{Room, Student, StudentRecord};
use rusqlite::{Connection, params};

use crate::error::{Result, SqliteError};
use crate::store::Store;

/// Result of a single insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was new and has been written.
    Inserted,
    /// A row with the same primary key already existed; nothing was written.
    Skipped,
}

/// Inserted and skipped counts for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub inserted: usize,
    pub skipped: usize,
}

impl TableCounts {
    fn record(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted => self.inserted += 1,
            InsertOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Per-table summary of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rooms: TableCounts,
    pub students: TableCounts,
}

/// Writes source records into a store's tables.
pub struct Loader<'a> {
    store: &'a mut Store,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Loads all rooms, then all students, in a single transaction.
    ///
    /// Rooms go first so that every student's room already exists when the
    /// foreign key is checked. Nothing is committed unless every record is
    /// processed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::ParseError`] if a student's birthday is not a
    /// date, or [`SqliteError::QueryError`] if a statement fails (for example
    /// a student referencing an unknown room, or a `sex` longer than one
    /// character). In both cases the transaction is rolled back.
    pub fn load(&mut self, rooms: &[Room], students: &[StudentRecord]) -> Result<LoadReport> {
        let rooms_table = self.store.rooms_table();
        let students_table = self.store.students_table();

        let tx = self.store.connection_mut().transaction()?;
        let mut report = LoadReport::default();

        for room in rooms {
            report.rooms.record(insert_room(&tx, &rooms_table, room)?);
        }

        for record in students {
            let student = record.to_student().map_err(SqliteError::ParseError)?;
            report
                .students
                .record(insert_student(&tx, &students_table, &student)?);
        }

        tx.commit()?;
        tracing::info!(
            rooms_inserted = report.rooms.inserted,
            rooms_skipped = report.rooms.skipped,
            students_inserted = report.students.inserted,
            students_skipped = report.students.skipped,
            "loaded data"
        );
        Ok(report)
    }
}

/// Inserts a room unless a room with the same id exists.
pub fn insert_room(conn: &Connection, table: &str, room: &Room) -> Result<InsertOutcome> {
    if row_exists(conn, table, room.id)? {
        tracing::debug!(table, id = room.id, "row exists, skipping");
        return Ok(InsertOutcome::Skipped);
    }
    conn.execute(
        &format!("INSERT INTO {table} (id, name) VALUES (?1, ?2)"),
        params![room.id, room.name],
    )?;
    Ok(InsertOutcome::Inserted)
}

/// Inserts a student unless a student with the same id exists.
pub fn insert_student(conn: &Connection, table: &str, student: &Student) -> Result<InsertOutcome> {
    if row_exists(conn, table, student.id)? {
        tracing::debug!(table, id = student.id, "row exists, skipping");
        return Ok(InsertOutcome::Skipped);
    }
    conn.execute(
        &format!(
            "INSERT INTO {table} (id, name, birthday, sex, room_id) VALUES (?1, ?2, ?3, ?4, ?5)"
        ),
        params![
            student.id,
            student.name,
            student.birthday,
            student.sex,
            student.room_id,
        ],
    )?;
    Ok(InsertOutcome::Inserted)
}

fn row_exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let exists: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}
