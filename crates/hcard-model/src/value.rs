use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar date (year, month, day) without time-of-day.
pub type CalendarDate = chrono::NaiveDate;

/// A normalized field value.
///
/// [`FieldValue::Missing`] is the single "no data" marker. It is distinct
/// from zero and from an empty string; the normalizer never produces
/// `Text("")`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Missing,
    Int(i64),
    Float(f64),
    Date(CalendarDate),
    Text(String),
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<CalendarDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Rendered text, or `placeholder` for the missing marker.
    ///
    /// Dates use `date_format` (a chrono `strftime` pattern). Floats drop
    /// trailing zeros.
    pub fn display_or(&self, placeholder: &str, date_format: &str) -> String {
        match self {
            FieldValue::Missing => placeholder.to_string(),
            FieldValue::Date(d) => d.format(date_format).to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    /// Dates print as ISO `YYYY-MM-DD`; the missing marker prints as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => Ok(()),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => {
                let s = format!("{v}");
                if s.contains('.') {
                    f.write_str(s.trim_end_matches('0').trim_end_matches('.'))
                } else {
                    f.write_str(&s)
                }
            }
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}
