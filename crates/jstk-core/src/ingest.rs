//! Capture dump ingest
//!
//! The extension persists captured endpoints as JSON. Two shapes are seen in
//! the wild: a bare array of record objects, and an object wrapping that
//! array under `urls`. Any other top-level shape is an error. Array entries
//! that are not objects are dropped here; field-level validation happens
//! later, at the adapter boundary.

use serde_json::Value;

use crate::store::StoreError;
use crate::types::RawRecord;

/// Keys accepted for each record field, in lookup order.
pub const ENDPOINT_KEYS: &[&str] = &["endpoint", "url"];
pub const SOURCE_FILE_KEYS: &[&str] = &["sourceFile", "file", "location"];
pub const WEBPAGE_KEYS: &[&str] = &["webpage", "page"];

/// Parse a capture dump into raw records.
pub fn parse_capture(text: &str) -> Result<Vec<RawRecord>, StoreError> {
    let value: Value = serde_json::from_str(text)?;
    records_from_value(value)
}

/// Convert an already decoded JSON value into raw records.
pub fn records_from_value(value: Value) -> Result<Vec<RawRecord>, StoreError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("urls") {
            Some(Value::Array(items)) => items,
            _ => return Err(StoreError::Shape("object without a `urls` array")),
        },
        _ => return Err(StoreError::Shape("neither an array nor an object")),
    };

    let total = items.len();
    let records: Vec<RawRecord> = items
        .into_iter()
        .filter(Value::is_object)
        .map(|item| raw_from_object(&item))
        .collect();

    if records.len() != total {
        log::debug!("dropped {} non-object capture entries", total - records.len());
    }
    Ok(records)
}

/// Field-by-field extraction so a wrongly typed field only blanks that field.
fn raw_from_object(item: &Value) -> RawRecord {
    RawRecord {
        endpoint: str_field(item, ENDPOINT_KEYS),
        source_file: str_field(item, SOURCE_FILE_KEYS),
        webpage: str_field(item, WEBPAGE_KEYS),
    }
}

fn str_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Serialize records back into the bare-array capture shape.
pub fn write_capture(records: &[RawRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let text = r#"[
            {"endpoint": "/a", "sourceFile": "x.js", "webpage": "p1"},
            {"url": "/b", "file": "y.js", "page": "p2"}
        ]"#;
        let records = parse_capture(text).unwrap();
        assert_eq!(records, vec![
            RawRecord::new("/a", "x.js", "p1"),
            RawRecord::new("/b", "y.js", "p2"),
        ]);
    }

    #[test]
    fn test_parse_wrapped_object() {
        let text = r#"{"urls": [{"endpoint": "/a", "sourceFile": "x.js", "webpage": "p1"}]}"#;
        let records = parse_capture(text).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_non_objects_dropped() {
        let text = r#"[1, "str", null, {"endpoint": "/a"}]"#;
        let records = parse_capture(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].endpoint.as_deref(), Some("/a"));
        assert!(records[0].webpage.is_none());
    }

    #[test]
    fn test_wrong_field_type_blanks_field() {
        let text = r#"[{"endpoint": 42, "sourceFile": "x.js", "webpage": "p1"}]"#;
        let records = parse_capture(text).unwrap();
        assert!(records[0].endpoint.is_none());
        assert_eq!(records[0].source_file.as_deref(), Some("x.js"));
    }

    #[test]
    fn test_unexpected_shapes() {
        assert!(matches!(parse_capture("42"), Err(StoreError::Shape(_))));
        assert!(matches!(parse_capture(r#"{"other": []}"#), Err(StoreError::Shape(_))));
        assert!(matches!(parse_capture(r#"{"urls": 3}"#), Err(StoreError::Shape(_))));
        assert!(matches!(parse_capture("not json"), Err(StoreError::Decode(_))));
        assert!(parse_capture("[]").unwrap().is_empty());
    }

    #[test]
    fn test_first_string_key_wins() {
        let text = r#"[{"endpoint": 7, "url": "/fallback", "file": "x.js", "location": "y.js", "page": "p1"}]"#;
        let records = parse_capture(text).unwrap();
        assert_eq!(records[0], RawRecord::new("/fallback", "x.js", "p1"));
    }

    #[test]
    fn test_write_capture_reparses() {
        let records = vec![RawRecord::new("/a", "x.js", "p1")];
        let text = write_capture(&records).unwrap();
        assert_eq!(parse_capture(&text).unwrap(), records);
    }
}
