//! Connection handling and generic statement execution.
//!
//! A [`Store`] owns one SQLite connection with foreign keys enabled and knows
//! which schema its tables belong to. Dropping the store closes the
//! connection, so scoping a store to a block releases it on every exit path.

use chrono::NaiveDate;
use roster_core::{DATE_FORMAT, Record, Value};
use roster_source::DatabaseConfig;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params};

use crate::error::{Result, SqliteError};
use crate::schema::{self, validate_schema};

/// Label used in errors and logs for in-memory databases.
const IN_MEMORY: &str = ":memory:";

/// An open database connection bound to a schema.
///
/// # Examples
///
/// ```
/// use roster_sqlite::Store;
///
/// let store = Store::open_in_memory("roster").unwrap();
/// let result = store.query("SELECT 1 AS one").unwrap();
/// assert_eq!(result.columns[0].name, "one");
/// ```
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    schema: String,
}

impl Store {
    /// Opens the database file named by `config.dbname`.
    ///
    /// The connection is checked with a read of the catalog before it is
    /// returned, so an unreadable or non-SQLite file fails here.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidSchema`] for a bad schema name and
    /// [`SqliteError::ConnectionError`] if the database cannot be used.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        validate_schema(&config.schema)?;
        if !config.host.is_empty() || !config.user.is_empty() {
            tracing::debug!(
                host = %config.host,
                user = %config.user,
                "embedded database does not use host or user"
            );
        }

        let conn = Connection::open(&config.dbname).map_err(|source| {
            SqliteError::ConnectionError {
                path: config.dbname.clone(),
                source,
            }
        })?;
        Self::init(conn, &config.schema, &config.dbname)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(schema: &str) -> Result<Self> {
        validate_schema(schema)?;
        let conn = Connection::open_in_memory().map_err(|source| SqliteError::ConnectionError {
            path: IN_MEMORY.to_string(),
            source,
        })?;
        Self::init(conn, schema, IN_MEMORY)
    }

    fn init(conn: Connection, schema: &str, label: &str) -> Result<Self> {
        let connection_error = |source: rusqlite::Error| SqliteError::ConnectionError {
            path: label.to_string(),
            source,
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(connection_error)?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_error)?;

        tracing::info!(database = label, schema, "connected to database");
        Ok(Self {
            conn,
            schema: schema.to_string(),
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn rooms_table(&self) -> String {
        schema::rooms_table(&self.schema)
    }

    pub fn students_table(&self) -> String {
        schema::students_table(&self.schema)
    }

    /// Executes a single parameterized statement and returns the number of
    /// rows it changed.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Runs a query and materializes every row.
    ///
    /// Columns declared `DATE` whose text is a `YYYY-MM-DD` date are returned
    /// as [`Value::Date`]; everything else maps by storage class.
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .map(|c| Column {
                name: c.name().to_string(),
                decl_type: c.decl_type().map(str::to_string),
            })
            .collect();

        let mut rows = stmt.query([])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let mut row_values = Vec::with_capacity(columns.len());
            for (idx, column) in columns.iter().enumerate() {
                row_values.push(to_value(row.get_ref(idx)?, column.decl_type.as_deref()));
            }
            values.push(row_values);
        }

        Ok(QueryResult {
            columns,
            rows: values,
        })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Column metadata reported by a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Declared type from the table definition, if the column has one.
    pub decl_type: Option<String>,
}

/// Column metadata plus every row of a query, in the order SQLite returned
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Pairs each row with the column names.
    pub fn into_records(self) -> Vec<Record> {
        let names: Vec<String> = self.columns.into_iter().map(|c| c.name).collect();
        self.rows
            .into_iter()
            .map(|row| names.iter().cloned().zip(row).collect())
            .collect()
    }
}

fn to_value(value: ValueRef<'_>, decl_type: Option<&str>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            if is_date_column(decl_type) {
                if let Ok(date) = NaiveDate::parse_from_str(&text, DATE_FORMAT) {
                    return Value::Date(date);
                }
            }
            Value::Text(text.into_owned())
        }
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

fn is_date_column(decl_type: Option<&str>) -> bool {
    decl_type.is_some_and(|t| t.eq_ignore_ascii_case("DATE"))
}
