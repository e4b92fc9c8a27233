//! JSON array-of-objects sources.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hcard_model::{RawRecord, RawValue};
use serde_json::Value;

use crate::csv::source_label;
use crate::error::{BatchSourceError, Result, open_error};

/// Reads `[{"Name": ..., ...}, ...]` as raw records.
///
/// Keys keep their order in the file. Nested arrays and objects are kept
/// as their JSON text.
pub fn read_json_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| BatchSourceError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    json_to_records(value, &source_label(path)).map_err(|reason| BatchSourceError::JsonShape {
        path: path.to_path_buf(),
        reason,
    })
}

/// Converts a parsed JSON document into raw records.
pub fn json_to_records(value: Value, source: &str) -> std::result::Result<Vec<RawRecord>, String> {
    let Value::Array(items) = value else {
        return Err("top-level value is not an array".to_string());
    };
    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(format!("element {idx} is not an object"));
        };
        let mut record = RawRecord::new(idx + 1).with_source(source);
        for (key, value) in map {
            record.push(key, json_value_to_raw(value));
        }
        if !record.is_blank() {
            records.push(record);
        }
    }
    Ok(records)
}

pub fn json_value_to_raw(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Missing,
        Value::Bool(b) => RawValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(v) => RawValue::Int(v),
            None => n.as_f64().map_or(RawValue::Missing, RawValue::Float),
        },
        Value::String(s) => RawValue::Text(s),
        other @ (Value::Array(_) | Value::Object(_)) => RawValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_array_of_objects() {
        let value = json!([
            {"Student's Name": "Jane Doe", "DATE OF ASSESSMENT": 45000, "BMI": "NA"},
            {},
            {"Student's Name": "John Roe", "Temperature": 98.6}
        ]);
        let records = json_to_records(value, "batch.json").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("DATE OF ASSESSMENT"),
            Some(&RawValue::Int(45000))
        );
        assert_eq!(records[1].row, 3);
        assert_eq!(records[1].get("Temperature"), Some(&RawValue::Float(98.6)));
    }

    #[test]
    fn keys_keep_file_order() {
        let value: Value =
            serde_json::from_str(r#"[{"Student Name": "Zed First", "Name": "Amy Later"}]"#)
                .unwrap();
        let records = json_to_records(value, "batch.json").unwrap();
        let keys: Vec<&str> = records[0].fields.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["Student Name", "Name"]);
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(json_to_records(json!({"Name": "Jane"}), "x").is_err());
        assert!(json_to_records(json!([1, 2]), "x").is_err());
    }
}
