//! Deterministic single-page layout for health-assessment reports.
//!
//! [`layout`] turns one [`CanonicalHealthRecord`](hcard_model::CanonicalHealthRecord)
//! into a [`Document`](hcard_model::Document): positioned headings,
//! label/value rows, section backgrounds, signature boxes and a footer on
//! a fixed canvas. Layout is pure; rendering the document is someone
//! else's job.
//!
//! Row heights are fixed by default. A [`RowHeightPolicy`] can grow rows
//! for long values without changing block order.

mod engine;
mod error;
pub mod metrics;
mod options;
mod row_height;
mod validate;

pub use engine::{LayoutEngine, layout};
pub use error::LayoutError;
pub use options::{DEFAULT_DATE_FORMAT, DEFAULT_LOGO_ASSET, DEFAULT_PLACEHOLDER, LayoutOptions};
pub use row_height::{FixedRowHeight, MeasuredRowHeight, RowHeightPolicy};
pub use validate::{check_bounds, check_overlaps};
