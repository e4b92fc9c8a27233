//! Spreadsheet date serials.
//!
//! Spreadsheet applications store dates as a count of days since
//! 1899-12-30, optionally with a fractional time-of-day part. Only the
//! calendar date is kept here.

use chrono::{Days, NaiveDate, NaiveDateTime};
use hcard_common::parse_f64;
use hcard_model::{CalendarDate, FieldValue, RawValue};

use crate::error::DateDecodeError;

/// Day zero of the spreadsheet calendar.
pub const SPREADSHEET_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Largest serial a spreadsheet can represent (9999-12-31).
pub const MAX_SERIAL: i64 = 2_958_465;

/// Textual formats accepted for date cells that are not serials.
const TEXT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d-%b-%Y", // 15-Mar-2023
    "%Y/%m/%d",
    "%d.%m.%Y",
];

const TEXT_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Converts a day serial to a calendar date, truncating any time-of-day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hcard_normalization::decode_spreadsheet_date;
///
/// let date = decode_spreadsheet_date(45000.75).unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
/// ```
pub fn decode_spreadsheet_date(serial: f64) -> Result<CalendarDate, DateDecodeError> {
    if !serial.is_finite() {
        return Err(DateDecodeError::NotFinite);
    }
    let days = serial.trunc();
    if days < 0.0 || days > MAX_SERIAL as f64 {
        return Err(DateDecodeError::OutOfRange(serial));
    }
    SPREADSHEET_EPOCH
        .checked_add_days(Days::new(days as u64))
        .ok_or(DateDecodeError::OutOfRange(serial))
}

/// Inverse of [`decode_spreadsheet_date`] for whole-day serials.
pub fn encode_spreadsheet_date(date: CalendarDate) -> i64 {
    date.signed_duration_since(SPREADSHEET_EPOCH).num_days()
}

/// Decodes a raw cell holding a serial.
///
/// Anything that is not a decodable serial becomes the missing marker.
pub fn decode_value(raw: &RawValue) -> FieldValue {
    let serial = match raw {
        RawValue::Int(v) => Some(*v as f64),
        RawValue::Float(v) => Some(*v),
        RawValue::Text(text) => parse_f64(text),
        RawValue::Missing | RawValue::Bool(_) => None,
    };
    serial
        .and_then(|s| decode_spreadsheet_date(s).ok())
        .map_or(FieldValue::Missing, FieldValue::Date)
}

/// Parses a textual date in one of the accepted day-first or ISO formats.
pub fn parse_text_date(value: &str) -> Option<CalendarDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in TEXT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    TEXT_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|dt| dt.date())
}
