//! Untransformed source rows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell as read from a spreadsheet, CSV line, or JSON object.
///
/// Spreadsheet date cells arrive as [`RawValue::Float`] or [`RawValue::Int`]
/// day-count serials; the normalizer decides what they mean.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    /// Returns the numeric value for `Int` and `Float` cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Int(v) => Some(*v as f64),
            RawValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Missing => Ok(()),
            RawValue::Bool(v) => write!(f, "{v}"),
            RawValue::Int(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

/// One source row with arbitrary header names, in source column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    /// Where the row came from (file name, optionally `file#sheet`).
    pub source: Option<String>,
    /// 1-based data row number within its source.
    pub row: usize,
    pub fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new(row: usize) -> Self {
        Self {
            source: None,
            row,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Returns the first value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every cell is missing or blank text.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| match value {
            RawValue::Missing => true,
            RawValue::Text(text) => text.trim().is_empty(),
            _ => false,
        })
    }

    /// Human-readable provenance such as `students.xlsx#Sheet1:12`.
    pub fn location(&self) -> String {
        match &self.source {
            Some(source) => format!("{source}:{}", self.row),
            None => format!("row {}", self.row),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new(1);
        for (key, value) in iter {
            record.push(key, value);
        }
        record
    }
}
