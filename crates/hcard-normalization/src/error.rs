use thiserror::Error;

/// Why a spreadsheet day serial could not become a calendar date.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DateDecodeError {
    #[error("date serial is not a finite number")]
    NotFinite,
    #[error("date serial {0} is outside 0..=2958465")]
    OutOfRange(f64),
}

/// A raw value that could not be coerced to its field's declared kind.
///
/// Never surfaced as a record failure: the normalizer substitutes the
/// missing marker and reports the issue alongside the record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("number is not finite")]
    NonFinite,
    #[error("'{0}' is not a recognised date")]
    UnrecognizedDate(String),
    #[error("invalid date serial: {0}")]
    Date(#[from] DateDecodeError),
    #[error("boolean value is not valid for a {0} field")]
    UnexpectedBoolean(&'static str),
    #[error("duplicate column for this field; first non-missing value kept")]
    DuplicateKey,
}
