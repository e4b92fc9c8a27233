//! Data model for Health Card Studio.
//!
//! - **raw**: untransformed spreadsheet rows ([`RawRecord`], [`RawValue`])
//! - **field**: the closed set of canonical fields ([`FieldId`], [`FieldKind`])
//! - **value** / **record**: the normalized record and its missing marker
//! - **document**: positioned layout blocks on a fixed page canvas
//! - **batch**: per-run counts and failure ledger

pub mod batch;
pub mod document;
pub mod error;
pub mod field;
pub mod raw;
pub mod record;
pub mod value;

pub use batch::{
    BatchResult, CollisionResolution, FailureReason, NameCollision, RecordDiagnostic,
    RecordFailure,
};
pub use document::{
    BlockKind, BlockStyle, Canvas, Color, Document, FontWeight, LayoutBlock, Rect, Section,
    TextAlign,
};
pub use error::{ModelError, Result};
pub use field::{FieldId, FieldKind};
pub use raw::{RawRecord, RawValue};
pub use record::CanonicalHealthRecord;
pub use value::{CalendarDate, FieldValue};
