//! Health-record normalization.
//!
//! Takes rows with whatever headers a school sheet happened to use and
//! produces [`CanonicalHealthRecord`](hcard_model::CanonicalHealthRecord)s.
//!
//! - **fields**: declarative table of accepted header spellings
//! - **coerce**: kind-directed value coercion and sentinel handling
//! - **date**: spreadsheet day-serial codec
//! - **normalizer**: the row-level entry points
//!
//! Normalization is total. Values that cannot be coerced fall back to the
//! missing marker and are reported as [`NormalizationIssue`]s.

mod coerce;
mod date;
mod error;
mod fields;
mod normalizer;

pub use coerce::{coerce_value, is_sentinel};
pub use date::{
    MAX_SERIAL, SPREADSHEET_EPOCH, decode_spreadsheet_date, decode_value,
    encode_spreadsheet_date, parse_text_date,
};
pub use error::{DateDecodeError, NormalizationError};
pub use fields::{FIELD_SPECS, FieldSpec, field_spec, lookup_field, normalize_key};
pub use normalizer::{
    NormalizationIssue, NormalizationOutcome, normalize, normalize_with_diagnostics,
};
