//! Data model for rooms, students, and retrieved result sets.
//!
//! Input records ([`Room`], [`StudentRecord`]) mirror the shape of the JSON
//! source files. [`Student`] is the parsed form that is written to storage.
//! Everything read back from storage is carried as a [`ResultSet`]: an
//! ordered mapping from category name to [`Record`]s, where each record is an
//! ordered list of column/[`Value`] pairs.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CoreError, Result};

/// Category name under which room rows are reported.
pub const ROOMS: &str = "rooms";

/// Category name under which student rows are reported.
pub const STUDENTS: &str = "students";

/// Calendar date layout used for storage and rendering.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A room, as read from the rooms source file.
///
/// # Examples
///
/// ```
/// use roster_core::Room;
///
/// let room: Room = serde_json::from_str(r#"{"id": 1, "name": "Room A"}"#).unwrap();
/// assert_eq!(room.id, 1);
/// assert_eq!(room.name.as_deref(), Some("Room A"));
///
/// let unnamed: Room = serde_json::from_str(r#"{"id": 2, "name": null}"#).unwrap();
/// assert_eq!(unnamed.name, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: Option<String>,
}

/// A student, as read from the students source file.
///
/// The birthday is kept as the raw string; [`to_student`](Self::to_student)
/// parses it. `name`, `sex` and `room` may be `null` (or absent) and are
/// stored as SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: i64,
    pub name: Option<String>,
    /// ISO-8601-like timestamp, e.g. `2000-05-01T00:00:00`.
    pub birthday: String,
    pub sex: Option<String>,
    /// Id of the room the student lives in.
    pub room: Option<i64>,
}

impl StudentRecord {
    /// Converts the raw record into a [`Student`], parsing the birthday.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ParseError`] if the birthday does not start with a
    /// `YYYY-MM-DD` date.
    pub fn to_student(&self) -> Result<Student> {
        let birthday = parse_birthday(&self.birthday)?;
        Ok(Student {
            id: self.id,
            name: self.name.clone(),
            birthday,
            sex: self.sex.clone(),
            room_id: self.room,
        })
    }
}

/// A student ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: Option<String>,
    pub birthday: NaiveDate,
    pub sex: Option<String>,
    pub room_id: Option<i64>,
}

/// Parses the first 10 characters of `raw` as a `YYYY-MM-DD` date.
///
/// Anything after the date (a time component, an offset) is ignored.
///
/// # Examples
///
/// ```
/// use roster_core::parse_birthday;
///
/// let date = parse_birthday("2000-05-01T13:45:00").unwrap();
/// assert_eq!(date.to_string(), "2000-05-01");
/// assert!(parse_birthday("05/01/2000").is_err());
/// ```
pub fn parse_birthday(raw: &str) -> Result<NaiveDate> {
    let date_part = raw.get(..10).ok_or_else(|| CoreError::ParseError {
        value: raw.to_string(),
        reason: "expected a leading YYYY-MM-DD date".to_string(),
    })?;

    NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|e| CoreError::ParseError {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// A single scalar read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    /// Raw bytes. Has no JSON mapping.
    Blob(Vec<u8>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Text form used for markup output.
///
/// `Null` is empty, dates use [`DATE_FORMAT`], and blobs are lowercase hex.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Blob(bytes) => {
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Real(v) if !v.is_finite() => Err(S::Error::custom(format!(
                "non-finite real value {v} has no JSON representation"
            ))),
            Value::Real(v) => serializer.serialize_f64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            Value::Blob(bytes) => Err(S::Error::custom(format!(
                "blob value ({} bytes) has no JSON representation",
                bytes.len()
            ))),
        }
    }
}

/// One row: column names paired with values, in column order.
///
/// # Examples
///
/// ```
/// use roster_core::{Record, Value};
///
/// let record = Record::new().with("id", 1).with("name", "Room A");
/// assert_eq!(record.get("name"), Some(&Value::Text("Room A".into())));
/// assert_eq!(record.column_names().collect::<Vec<_>>(), ["id", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, returning the record for chaining.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Appends a column after the existing ones.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((column.into(), value.into()));
    }

    /// Returns the value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered mapping from category name to the records in that category.
///
/// Category order is insertion order; re-inserting an existing category
/// replaces its records in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    categories: Vec<(String, Vec<Record>)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the records for `category`.
    pub fn insert(&mut self, category: impl Into<String>, records: Vec<Record>) {
        let category = category.into();
        match self.categories.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = records,
            None => self.categories.push((category, records)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, category: impl Into<String>, records: Vec<Record>) -> Self {
        self.insert(category, records);
        self
    }

    pub fn get(&self, category: &str) -> Option<&[Record]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, records)| records.as_slice())
    }

    /// Iterates over categories in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.categories
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, records) in &self.categories {
            map.serialize_entry(name, records)?;
        }
        map.end()
    }
}
