//! Schema setup for the roster tables.
//!
//! Provides [`Migration`] for creating the tables of a [`Store`]'s schema and
//! reporting what they contain.
//!
//! # Example
//!
//! ```
//! use roster_sqlite::{Migration, Store};
//!
//! let mut store = Store::open_in_memory("roster").unwrap();
//! let mut migration = Migration::new(&mut store);
//!
//! migration.up().unwrap();
//! migration.up().unwrap(); // safe to repeat
//!
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//! assert_eq!(status.room_count, 0);
//! ```

use crate::error::{Result, SqliteError};
use crate::schema::generate_schema_sql;
use crate::store::Store;

/// Creates and inspects the roster tables of a store's schema.
pub struct Migration<'a> {
    store: &'a mut Store,
}

impl<'a> Migration<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Creates the rooms and students tables and their index.
    ///
    /// Uses `CREATE ... IF NOT EXISTS` so it is safe to call multiple times.
    /// Executes within a transaction.
    pub fn up(&mut self) -> Result<()> {
        let sql = generate_schema_sql(self.store.schema())?;
        let tx = self.store.connection_mut().transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        tracing::info!(schema = self.store.schema(), "schema and tables created");
        Ok(())
    }

    /// Returns whether the tables exist and how many rows each holds.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.tables_exist()? {
            return Ok(MigrationStatus::default());
        }

        Ok(MigrationStatus {
            tables_exist: true,
            room_count: self.count_rows(&self.store.rooms_table())?,
            student_count: self.count_rows(&self.store.students_table())?,
        })
    }

    /// Checks whether both tables exist.
    fn tables_exist(&self) -> Result<bool> {
        let mut stmt = self.store.connection().prepare(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2)",
        )?;
        let count: i64 = stmt.query_row(
            [self.store.rooms_table(), self.store.students_table()],
            |row| row.get(0),
        )?;
        Ok(count == 2)
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 = self.store.connection().query_row(
            &format!("SELECT COUNT(*) FROM {table}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Snapshot of the roster tables, returned by [`Migration::status`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Whether both tables exist.
    pub tables_exist: bool,
    pub room_count: usize,
    pub student_count: usize,
}
