//! Reading flat JSON arrays of records from disk.

use std::io::BufReader;
use std::path::Path;

use roster_core::{Room, StudentRecord};
use serde::de::DeserializeOwned;

use crate::error::{Result, SourceError};

/// Reads a file containing a single JSON array and deserializes each element.
///
/// # Errors
///
/// Returns [`SourceError::IoError`] if the file cannot be opened, or
/// [`SourceError::ParseError`] if it is not an array of `T`.
pub fn read_json_array<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| SourceError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<T> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| SourceError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), count = records.len(), "read source file");
    Ok(records)
}

/// Reads the rooms file (`[{"id": .., "name": ..}, ...]`).
pub fn read_rooms(path: impl AsRef<Path>) -> Result<Vec<Room>> {
    read_json_array(path)
}

/// Reads the students file
/// (`[{"id": .., "name": .., "birthday": .., "sex": .., "room": ..}, ...]`).
pub fn read_students(path: impl AsRef<Path>) -> Result<Vec<StudentRecord>> {
    read_json_array(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rooms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooms.json");
        std::fs::write(&path, r#"[{"id": 1, "name": "Room A"}, {"id": 2, "name": "Room B"}]"#)
            .unwrap();

        let rooms = read_rooms(&path).unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[1].name.as_deref(), Some("Room B"));
    }

    #[test]
    fn test_read_students_keeps_raw_birthday() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(
            &path,
            r#"[{"id": 10, "name": "Alice", "birthday": "2000-05-01T00:00:00.000000", "sex": "F", "room": 1}]"#,
        )
        .unwrap();

        let students = read_students(&path).unwrap();
        assert_eq!(students[0].birthday, "2000-05-01T00:00:00.000000");
        assert_eq!(students[0].room, Some(1));
    }

    #[test]
    fn test_read_null_fields() {
        let dir = tempfile::tempdir().unwrap();
        let rooms_path = dir.path().join("rooms.json");
        let students_path = dir.path().join("students.json");
        std::fs::write(&rooms_path, r#"[{"id": 1, "name": null}]"#).unwrap();
        std::fs::write(
            &students_path,
            r#"[{"id": 10, "name": null, "birthday": "2000-05-01", "sex": null, "room": null}]"#,
        )
        .unwrap();

        assert_eq!(read_rooms(&rooms_path).unwrap()[0].name, None);
        let student = &read_students(&students_path).unwrap()[0];
        assert_eq!(student.name, None);
        assert_eq!(student.sex, None);
        assert_eq!(student.room, None);
    }

    #[test]
    fn test_read_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooms.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(read_rooms(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_rooms("/nonexistent/roster/rooms.json").unwrap_err();
        assert!(matches!(err, SourceError::IoError { .. }));
    }

    #[test]
    fn test_read_object_instead_of_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooms.json");
        std::fs::write(&path, r#"{"id": 1, "name": "Room A"}"#).unwrap();

        let err = read_rooms(&path).unwrap_err();
        assert!(matches!(err, SourceError::ParseError { .. }));
        assert!(err.to_string().contains("rooms.json"));
    }

    #[test]
    fn test_read_record_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, r#"[{"id": 10, "name": "Alice"}]"#).unwrap();
        assert!(read_students(&path).is_err());
    }
}
