//! Rendering of a [`ResultSet`] as JSON or XML.
//!
//! Both renderers walk the result set in order (categories, then records,
//! then columns), so output is deterministic for a given input.
//!
//! # JSON
//!
//! ```
//! use roster_core::{Record, ResultSet, to_json};
//!
//! let rs = ResultSet::new().with("rooms", vec![Record::new().with("id", 1)]);
//! let json = to_json(&rs).unwrap();
//! assert!(json.starts_with("{\n    \"rooms\": ["));
//! ```
//!
//! # XML
//!
//! ```
//! use roster_core::{Record, ResultSet, to_xml};
//!
//! let rs = ResultSet::new().with("rooms", vec![Record::new().with("id", 1)]);
//! assert_eq!(to_xml(&rs).unwrap(), "<data><rooms><item><id>1</id></item></rooms></data>");
//! ```

use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::types::ResultSet;

/// Name of the XML document element.
pub const XML_ROOT: &str = "data";

/// Name of the XML element wrapping each record.
pub const XML_ITEM: &str = "item";

const JSON_INDENT: &[u8] = b"    ";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

/// Renders a result set in the requested format.
///
/// # Errors
///
/// Returns [`CoreError::SerializationError`] if a value has no JSON mapping
/// (JSON) or a category or column name is not a valid element name (XML).
pub fn render(rs: &ResultSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(rs),
        OutputFormat::Xml => to_xml(rs),
    }
}

/// Serializes a result set as a JSON object indented by four spaces.
///
/// Top-level keys are category names, each mapping to an array of objects
/// whose keys follow column order. Dates are written as `YYYY-MM-DD` strings.
///
/// # Errors
///
/// Returns [`CoreError::SerializationError`] for blob values and for
/// non-finite reals.
pub fn to_json(rs: &ResultSet) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    rs.serialize(&mut serializer)
        .map_err(|e| CoreError::SerializationError(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| CoreError::SerializationError(e.to_string()))
}

/// Serializes a result set as a compact XML document.
///
/// ```text
/// <data><category><item><column>value</column>...</item>...</category>...</data>
/// ```
///
/// Elements without content are self-closing. Text is escaped for `&`, `<`
/// and `>` only.
///
/// # Errors
///
/// Returns [`CoreError::SerializationError`] if a category or column name is
/// not a valid XML element name.
pub fn to_xml(rs: &ResultSet) -> Result<String> {
    let mut out = String::new();

    if rs.is_empty() {
        push_empty(&mut out, XML_ROOT);
        return Ok(out);
    }

    push_open(&mut out, XML_ROOT);
    for (category, records) in rs.categories() {
        check_element_name(category)?;
        if records.is_empty() {
            push_empty(&mut out, category);
            continue;
        }

        push_open(&mut out, category);
        for record in records {
            if record.is_empty() {
                push_empty(&mut out, XML_ITEM);
                continue;
            }

            push_open(&mut out, XML_ITEM);
            for (column, value) in record.fields() {
                check_element_name(column)?;
                let text = value.to_string();
                if text.is_empty() {
                    push_empty(&mut out, column);
                } else {
                    push_open(&mut out, column);
                    push_escaped(&mut out, &text);
                    push_close(&mut out, column);
                }
            }
            push_close(&mut out, XML_ITEM);
        }
        push_close(&mut out, category);
    }
    push_close(&mut out, XML_ROOT);

    Ok(out)
}

/// Accepts names made of a letter or `_` followed by letters, digits, `_`,
/// `-` or `.`.
fn check_element_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CoreError::SerializationError(format!(
            "'{name}' is not a valid XML element name"
        )))
    }
}

fn push_open(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
}

fn push_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_empty(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push_str(" />");
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
}

/// Returns `true` if `c` may appear in XML 1.0 character data.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
