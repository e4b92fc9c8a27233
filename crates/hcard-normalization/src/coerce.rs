//! Value coercion by declared field kind.

use hcard_common::{ParsedNumber, format_numeric, parse_f64, parse_number};
use hcard_model::{FieldKind, FieldValue, RawValue};

use crate::date::{decode_spreadsheet_date, parse_text_date};
use crate::error::NormalizationError;

/// Source spellings of "no data", compared exactly after trimming. `Na` and
/// `n/a` are real values (a surname, a text answer).
const MISSING_SENTINELS: &[&str] = &["NA", "N/A"];

/// True for values that mean "no data": absent, blank, `NA`, `N/A`.
pub fn is_sentinel(raw: &RawValue) -> bool {
    match raw {
        RawValue::Missing => true,
        RawValue::Text(text) => {
            let trimmed = text.trim();
            trimmed.is_empty()
                || MISSING_SENTINELS.contains(&trimmed)
        }
        _ => false,
    }
}

/// Coerces one raw value to `kind`.
///
/// Sentinels become [`FieldValue::Missing`] without error. An `Err` means
/// the value was present but unusable; callers fall back to the missing
/// marker.
pub fn coerce_value(kind: FieldKind, raw: &RawValue) -> Result<FieldValue, NormalizationError> {
    if is_sentinel(raw) {
        return Ok(FieldValue::Missing);
    }
    match kind {
        FieldKind::Text => Ok(coerce_text(raw)),
        FieldKind::Numeric => coerce_numeric(raw),
        FieldKind::Contact => coerce_contact(raw),
        FieldKind::Date => coerce_date(raw),
    }
}

fn coerce_text(raw: &RawValue) -> FieldValue {
    let text = match raw {
        RawValue::Missing => return FieldValue::Missing,
        RawValue::Bool(v) => v.to_string(),
        RawValue::Int(v) => v.to_string(),
        RawValue::Float(v) if v.is_finite() => format_numeric(*v),
        RawValue::Float(_) => return FieldValue::Missing,
        RawValue::Text(v) => v.trim().to_string(),
    };
    if text.is_empty() {
        FieldValue::Missing
    } else {
        FieldValue::Text(text)
    }
}

fn coerce_numeric(raw: &RawValue) -> Result<FieldValue, NormalizationError> {
    match raw {
        RawValue::Missing => Ok(FieldValue::Missing),
        RawValue::Int(v) => Ok(FieldValue::Int(*v)),
        RawValue::Float(v) if v.is_finite() => Ok(FieldValue::Float(*v)),
        RawValue::Float(_) => Err(NormalizationError::NonFinite),
        RawValue::Text(text) => match parse_number(text) {
            Some(ParsedNumber::Int(v)) => Ok(FieldValue::Int(v)),
            Some(ParsedNumber::Float(v)) => Ok(FieldValue::Float(v)),
            None => Err(NormalizationError::NotNumeric(text.trim().to_string())),
        },
        RawValue::Bool(_) => Err(NormalizationError::UnexpectedBoolean(
            FieldKind::Numeric.as_str(),
        )),
    }
}

/// Phone numbers often arrive as floats (`9.876543210E9`); keep only the
/// integer digits so no exponent or grouping leaks into the report.
fn coerce_contact(raw: &RawValue) -> Result<FieldValue, NormalizationError> {
    match raw {
        RawValue::Missing => Ok(FieldValue::Missing),
        RawValue::Int(v) => Ok(FieldValue::Text(v.to_string())),
        RawValue::Float(v) => truncate_contact(*v),
        RawValue::Text(text) => match parse_f64(text) {
            Some(v) => truncate_contact(v),
            None => Ok(FieldValue::Text(text.trim().to_string())),
        },
        RawValue::Bool(_) => Err(NormalizationError::UnexpectedBoolean(
            FieldKind::Contact.as_str(),
        )),
    }
}

fn truncate_contact(value: f64) -> Result<FieldValue, NormalizationError> {
    if !value.is_finite() {
        return Err(NormalizationError::NonFinite);
    }
    Ok(FieldValue::Text(format!("{}", value.trunc() as i64)))
}

fn coerce_date(raw: &RawValue) -> Result<FieldValue, NormalizationError> {
    let serial = match raw {
        RawValue::Missing => return Ok(FieldValue::Missing),
        RawValue::Int(v) => *v as f64,
        RawValue::Float(v) => *v,
        RawValue::Text(text) => match parse_f64(text) {
            Some(v) => v,
            None => {
                return parse_text_date(text)
                    .map(FieldValue::Date)
                    .ok_or_else(|| NormalizationError::UnrecognizedDate(text.trim().to_string()));
            }
        },
        RawValue::Bool(_) => {
            return Err(NormalizationError::UnexpectedBoolean(
                FieldKind::Date.as_str(),
            ));
        }
    };
    Ok(FieldValue::Date(decode_spreadsheet_date(serial)?))
}
