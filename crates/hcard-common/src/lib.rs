//! Shared utilities for Health Card Studio crates.
//!
//! Numeric parsing and formatting used by normalization, ingest and the
//! renderers alike.

pub mod numeric;

pub use numeric::{ParsedNumber, format_numeric, has_fraction, parse_f64, parse_i64, parse_number};
