//! Inbound batch payload normalization.
//!
//! The `data` part of a batch arrives in one of two shapes: a JSON array
//! of row objects, or a JSON string that itself contains a serialized
//! array (spreadsheet frontends tend to double-encode). Normalization
//! happens exactly once at the orchestrator boundary; anything that does
//! not normalize to a list of rows is fatal for the whole batch, before
//! any row is processed.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::models::RetailerRecord;

/// Parse a raw `data` payload into records, or fail the whole batch.
pub fn parse_batch_str(raw: &str) -> Result<Vec<RetailerRecord>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| anyhow::anyhow!("invalid data payload: not valid JSON ({})", e))?;
    parse_batch(value)
}

/// Normalize an already-parsed `data` value into records.
///
/// Accepts an array, or a string containing a serialized array. Anything
/// else is a batch-fatal parse error.
pub fn parse_batch(data: Value) -> Result<Vec<RetailerRecord>> {
    let rows = match data {
        Value::Array(rows) => rows,
        Value::String(inner) => {
            let nested: Value = serde_json::from_str(&inner)
                .map_err(|e| anyhow::anyhow!("invalid data payload: not valid JSON ({})", e))?;
            match nested {
                Value::Array(rows) => rows,
                other => bail!(
                    "invalid data payload: expected a list of records, got {}",
                    type_name(&other)
                ),
            }
        }
        other => bail!(
            "invalid data payload: expected a list of records, got {}",
            type_name(&other)
        ),
    };

    Ok(rows.iter().map(record_from_value).collect())
}

/// Build one record from a row value. Scalar fields are stringified
/// (spreadsheet exports hand back numbers for mobile and age columns);
/// a non-object row becomes an empty record, which validation then
/// skips.
fn record_from_value(row: &Value) -> RetailerRecord {
    RetailerRecord {
        distributor_name: text(row, "distributor_name"),
        location: text(row, "location"),
        salesman_name: text(row, "salesman_name"),
        shop_name: text(row, "shop_name"),
        shop_address: text(row, "shop_address"),
        contact_person: text(row, "contact_person"),
        contact_mobile: text(row, "contact_mobile"),
        shop_age: text(row, "shop_age"),
        shop_photo: text(row, "shop_photo"),
        google_map_link: text(row, "google_map_link"),
        timestamp: text(row, "timestamp"),
    }
}

fn text(row: &Value, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_structured_list() {
        let records = parse_batch(json!([
            {"distributor_name": "Acme", "shop_name": "Acme Store", "shop_photo": "photo1.jpg"},
            {"distributor_name": "Bolt", "shop_name": "Bolt Mart"}
        ]))
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].shop_photo.as_deref(), Some("photo1.jpg"));
        assert_eq!(records[1].shop_photo, None);
    }

    #[test]
    fn parses_serialized_list() {
        let inner = r#"[{"distributor_name":"Acme","shop_name":"Acme Store"}]"#;
        let records = parse_batch(Value::String(inner.to_string())).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_importable());
    }

    #[test]
    fn numbers_are_stringified() {
        let records = parse_batch(json!([
            {"distributor_name": "Acme", "shop_name": "Acme Store",
             "contact_mobile": 9876543210u64, "shop_age": 5}
        ]))
        .unwrap();

        assert_eq!(records[0].contact_mobile.as_deref(), Some("9876543210"));
        assert_eq!(records[0].shop_age.as_deref(), Some("5"));
    }

    #[test]
    fn non_list_payload_is_fatal() {
        assert!(parse_batch_str("not json at all").is_err());
        assert!(parse_batch(json!({"distributor_name": "Acme"})).is_err());
        assert!(parse_batch(json!(42)).is_err());
        assert!(parse_batch(Value::String("\"a plain string\"".to_string())).is_err());
    }

    #[test]
    fn non_object_rows_become_skippable_records() {
        let records = parse_batch(json!(["stray", 7, null])).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| !r.is_importable()));
    }
}
