//! Core data model and renderers for the roster workspace.
//!
//! This crate defines the types shared by every other roster crate:
//!
//! - [`Room`] and [`StudentRecord`]: records as they appear in the JSON
//!   source files, and [`Student`], the parsed form written to storage.
//! - [`ResultSet`], [`Record`], and [`Value`]: rows read back from storage,
//!   kept in category, row, and column order.
//!
//! Rendering ([`to_json`], [`to_xml`], [`render`]) turns a [`ResultSet`] into
//! an output document.
//!
//! # Example
//!
//! ```
//! use roster_core::*;
//!
//! let student = StudentRecord {
//!     id: 10,
//!     name: Some("Alice".into()),
//!     birthday: "2000-05-01T00:00:00".into(),
//!     sex: Some("F".into()),
//!     room: Some(1),
//! }
//! .to_student()
//! .unwrap();
//!
//! let rs = ResultSet::new().with(
//!     STUDENTS,
//!     vec![Record::new().with("id", student.id).with("birthday", student.birthday)],
//! );
//!
//! assert_eq!(
//!     render(&rs, OutputFormat::Xml).unwrap(),
//!     "<data><students><item><id>10</id><birthday>2000-05-01</birthday></item></students></data>"
//! );
//! ```

mod error;
mod format;
mod types;

pub use error::{CoreError, Result};
pub use format::{OutputFormat, XML_ITEM, XML_ROOT, render, to_json, to_xml};
pub use types::*;
