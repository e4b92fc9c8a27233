//! Row-height policies for label/value rows.
//!
//! The default keeps every row at [`ROW_HEIGHT`]. A policy that grows rows
//! shifts later rows of the same column down; block order never changes.

use hcard_model::FieldId;

use crate::metrics::{BODY_FONT_SIZE, LABEL_SHARE, ROW_HEIGHT};

/// Decides how tall one label/value row is.
pub trait RowHeightPolicy: Send + Sync {
    /// Height of the row showing `value` for `field` in a column
    /// `column_width` points wide. Never less than [`ROW_HEIGHT`].
    fn row_height(&self, field: FieldId, value: &str, column_width: f64) -> f64;
}

/// Every row is [`ROW_HEIGHT`] tall, whatever its content.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedRowHeight;

impl RowHeightPolicy for FixedRowHeight {
    fn row_height(&self, _field: FieldId, _value: &str, _column_width: f64) -> f64 {
        ROW_HEIGHT
    }
}

/// Grows rows whose value would wrap, using an average glyph width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredRowHeight {
    /// Average glyph advance as a share of the font size.
    pub glyph_ratio: f64,
    pub font_size: f64,
    /// Extra height per wrapped line.
    pub line_height: f64,
}

impl Default for MeasuredRowHeight {
    fn default() -> Self {
        Self {
            glyph_ratio: 0.5,
            font_size: BODY_FONT_SIZE,
            line_height: 12.0,
        }
    }
}

impl MeasuredRowHeight {
    /// Lines `value` needs in a value cell `width` points wide.
    pub fn line_count(&self, value: &str, width: f64) -> usize {
        let glyph = (self.font_size * self.glyph_ratio).max(f64::EPSILON);
        let per_line = ((width / glyph).floor() as usize).max(1);
        let chars = value.chars().count();
        chars.div_ceil(per_line).max(1)
    }
}

impl RowHeightPolicy for MeasuredRowHeight {
    fn row_height(&self, _field: FieldId, value: &str, column_width: f64) -> f64 {
        let value_width = column_width * (1.0 - LABEL_SHARE);
        let lines = self.line_count(value, value_width);
        ROW_HEIGHT + (lines - 1) as f64 * self.line_height
    }
}
