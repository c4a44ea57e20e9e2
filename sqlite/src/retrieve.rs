//! Reading the roster tables back as a [`ResultSet`].

use roster_core::{ROOMS, ResultSet, STUDENTS};

use crate::error::Result;
use crate::store::Store;

/// Fetches every room and every student.
///
/// The result has the categories [`ROOMS`] and [`STUDENTS`], in that order.
/// Column names come from each table's own column metadata. Rows are in
/// whatever order SQLite returns them; no ordering is requested.
///
/// # Errors
///
/// Returns [`SqliteError::QueryError`](crate::SqliteError::QueryError) if
/// either table cannot be read, for example before the schema exists.
pub fn retrieve(store: &Store) -> Result<ResultSet> {
    let mut rs = ResultSet::new();
    for (category, table) in [
        (ROOMS, store.rooms_table()),
        (STUDENTS, store.students_table()),
    ] {
        let result = store.query(&format!("SELECT * FROM {table}"))?;
        tracing::debug!(table = %table, rows = result.rows.len(), "retrieved rows");
        rs.insert(category, result.into_records());
    }
    Ok(rs)
}
