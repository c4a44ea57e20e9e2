//! Integration tests for the roster-sqlite crate.

use roster_core::{ROOMS, Room, STUDENTS, StudentRecord, Value, to_json, to_xml};
use roster_source::DatabaseConfig;
use roster_sqlite::{Loader, Migration, SqliteError, Store, retrieve};

fn sample_rooms() -> Vec<Room> {
    vec![Room {
        id: 1,
        name: Some("Room A".to_string()),
    }]
}

fn sample_students() -> Vec<StudentRecord> {
    vec![StudentRecord {
        id: 10,
        name: Some("Alice".to_string()),
        birthday: "2000-05-01T00:00:00".to_string(),
        sex: Some("F".to_string()),
        room: Some(1),
    }]
}

fn migrated_store() -> Store {
    let mut store = Store::open_in_memory("roster").unwrap();
    Migration::new(&mut store).up().unwrap();
    store
}

// ---------------------------------------------------------------------------
// Load → retrieve → render
// ---------------------------------------------------------------------------

#[test]
fn test_loaded_data_renders_as_json() {
    let mut store = migrated_store();
    Loader::new(&mut store)
        .load(&sample_rooms(), &sample_students())
        .unwrap();

    let rs = retrieve(&store).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&to_json(&rs).unwrap()).unwrap();
    let expected = serde_json::json!({
        "rooms": [{"id": 1, "name": "Room A"}],
        "students": [{
            "id": 10,
            "name": "Alice",
            "birthday": "2000-05-01",
            "sex": "F",
            "room_id": 1
        }]
    });
    assert_eq!(parsed, expected);
}

#[test]
fn test_loaded_data_renders_as_xml() {
    let mut store = migrated_store();
    Loader::new(&mut store)
        .load(&sample_rooms(), &sample_students())
        .unwrap();

    let rs = retrieve(&store).unwrap();
    assert_eq!(
        to_xml(&rs).unwrap(),
        "<data><rooms><item><id>1</id><name>Room A</name></item></rooms>\
         <students><item><id>10</id><name>Alice</name><birthday>2000-05-01</birthday>\
         <sex>F</sex><room_id>1</room_id></item></students></data>"
    );
}

#[test]
fn test_birthday_comes_back_as_date() {
    let mut store = migrated_store();
    Loader::new(&mut store)
        .load(&sample_rooms(), &sample_students())
        .unwrap();

    let rs = retrieve(&store).unwrap();
    let student = &rs.get(STUDENTS).unwrap()[0];
    assert!(matches!(student.get("birthday"), Some(Value::Date(_))));
}

#[test]
fn test_json_round_trip_of_retrieved_data() {
    let mut store = migrated_store();
    let rooms: Vec<Room> = (1..=3)
        .map(|id| Room {
            id,
            name: Some(format!("Room {id}")),
        })
        .collect();
    let students: Vec<StudentRecord> = (1..=6)
        .map(|id| StudentRecord {
            id: 100 + id,
            name: Some(format!("Student <{id}> & co")),
            birthday: format!("2001-0{}-1{}T08:00:00", (id % 9) + 1, id % 10),
            sex: Some(if id % 2 == 0 { "F" } else { "M" }.to_string()),
            room: Some((id % 3) + 1),
        })
        .collect();
    Loader::new(&mut store).load(&rooms, &students).unwrap();

    let rs = retrieve(&store).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&to_json(&rs).unwrap()).unwrap();

    for (category, records) in rs.categories() {
        let array = parsed[category].as_array().unwrap();
        assert_eq!(array.len(), records.len());
        for (object, record) in array.iter().zip(records) {
            for (column, value) in record.fields() {
                let json = &object[column];
                match value {
                    Value::Integer(v) => assert_eq!(json.as_i64(), Some(*v)),
                    Value::Text(v) => assert_eq!(json.as_str(), Some(v.as_str())),
                    Value::Date(d) => assert_eq!(json.as_str(), Some(d.to_string().as_str())),
                    other => panic!("unexpected value {other:?}"),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Idempotence and constraints
// ---------------------------------------------------------------------------

#[test]
fn test_loading_twice_keeps_row_counts() {
    let mut store = migrated_store();

    let first = Loader::new(&mut store)
        .load(&sample_rooms(), &sample_students())
        .unwrap();
    let after_first = Migration::new(&mut store).status().unwrap();

    let second = Loader::new(&mut store)
        .load(&sample_rooms(), &sample_students())
        .unwrap();
    let after_second = Migration::new(&mut store).status().unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.room_count, 1);
    assert_eq!(after_second.student_count, 1);

    assert_eq!(first.rooms.inserted, 1);
    assert_eq!(first.students.inserted, 1);
    assert_eq!(second.rooms.inserted, 0);
    assert_eq!(second.rooms.skipped, 1);
    assert_eq!(second.students.skipped, 1);
}

#[test]
fn test_existing_rows_are_not_updated() {
    let mut store = migrated_store();
    Loader::new(&mut store).load(&sample_rooms(), &[]).unwrap();

    let renamed = vec![Room {
        id: 1,
        name: Some("Renamed".to_string()),
    }];
    Loader::new(&mut store).load(&renamed, &[]).unwrap();

    let rs = retrieve(&store).unwrap();
    let room = &rs.get(ROOMS).unwrap()[0];
    assert_eq!(room.get("name"), Some(&Value::Text("Room A".to_string())));
}

#[test]
fn test_student_with_unknown_room_is_not_persisted() {
    let mut store = migrated_store();
    Loader::new(&mut store).load(&sample_rooms(), &[]).unwrap();

    let mut orphan = sample_students();
    orphan[0].room = Some(99);
    let err = Loader::new(&mut store).load(&[], &orphan).unwrap_err();
    assert!(matches!(err, SqliteError::QueryError(_)));

    let status = Migration::new(&mut store).status().unwrap();
    assert_eq!(status.room_count, 1);
    assert_eq!(status.student_count, 0);
}

#[test]
fn test_malformed_birthday_aborts_whole_load() {
    let mut store = migrated_store();
    let mut students = sample_students();
    students.push(StudentRecord {
        id: 11,
        name: Some("Bob".to_string()),
        birthday: "01/02/2000".to_string(),
        sex: Some("M".to_string()),
        room: Some(1),
    });

    let err = Loader::new(&mut store)
        .load(&sample_rooms(), &students)
        .unwrap_err();
    assert!(matches!(err, SqliteError::ParseError(_)));

    let status = Migration::new(&mut store).status().unwrap();
    assert_eq!(status.room_count, 0);
    assert_eq!(status.student_count, 0);
}

#[test]
fn test_null_source_fields_come_back_as_null() {
    let mut store = migrated_store();
    let rooms: Vec<Room> = serde_json::from_str(r#"[{"id": 1, "name": null}]"#).unwrap();
    let students: Vec<StudentRecord> = serde_json::from_str(
        r#"[{"id": 10, "name": null, "birthday": "2000-05-01", "sex": null, "room": null}]"#,
    )
    .unwrap();
    Loader::new(&mut store).load(&rooms, &students).unwrap();

    let rs = retrieve(&store).unwrap();
    let room = &rs.get(ROOMS).unwrap()[0];
    assert_eq!(room.get("name"), Some(&Value::Null));

    let student = &rs.get(STUDENTS).unwrap()[0];
    assert_eq!(student.get("name"), Some(&Value::Null));
    assert_eq!(student.get("sex"), Some(&Value::Null));
    assert_eq!(student.get("room_id"), Some(&Value::Null));

    assert_eq!(
        to_xml(&rs).unwrap(),
        "<data><rooms><item><id>1</id><name /></item></rooms>\
         <students><item><id>10</id><name /><birthday>2000-05-01</birthday>\
         <sex /><room_id /></item></students></data>"
    );
}

#[test]
fn test_multi_character_sex_is_rejected_by_storage() {
    let mut store = migrated_store();
    let mut students = sample_students();
    students[0].sex = Some("Female".to_string());

    let err = Loader::new(&mut store)
        .load(&sample_rooms(), &students)
        .unwrap_err();
    assert!(matches!(err, SqliteError::QueryError(_)));

    let rs = retrieve(&store).unwrap();
    assert!(rs.get(ROOMS).unwrap().is_empty());
    assert!(rs.get(STUDENTS).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// One connection per phase
// ---------------------------------------------------------------------------

#[test]
fn test_phases_with_separate_connections() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("roster.db");
    let config = DatabaseConfig::new(db_path.to_string_lossy());

    {
        let mut store = Store::connect(&config).unwrap();
        Migration::new(&mut store).up().unwrap();
    }
    {
        let mut store = Store::connect(&config).unwrap();
        Loader::new(&mut store)
            .load(&sample_rooms(), &sample_students())
            .unwrap();
    }

    let store = Store::connect(&config).unwrap();
    let rs = retrieve(&store).unwrap();
    assert_eq!(rs.get(ROOMS).unwrap().len(), 1);
    assert_eq!(rs.get(STUDENTS).unwrap().len(), 1);
}

#[test]
fn test_custom_schema_name_prefixes_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("roster.db");
    let mut config = DatabaseConfig::new(db_path.to_string_lossy());
    config.schema = "schematask1".to_string();

    let mut store = Store::connect(&config).unwrap();
    Migration::new(&mut store).up().unwrap();
    Loader::new(&mut store)
        .load(&sample_rooms(), &sample_students())
        .unwrap();

    let count: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM schematask1_students", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_invalid_schema_name_is_rejected_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("roster.db");
    let mut config = DatabaseConfig::new(db_path.to_string_lossy());
    config.schema = "rooms; DROP TABLE x".to_string();

    let err = Store::connect(&config).unwrap_err();
    assert!(matches!(err, SqliteError::InvalidSchema(_)));
    assert!(!db_path.exists());
}
