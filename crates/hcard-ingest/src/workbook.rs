//! Spreadsheet workbooks read through calamine.
//!
//! Every worksheet is a batch source of its own. The first non-empty row of
//! a sheet is its header row; sheets without one are skipped.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use hcard_model::{RawRecord, RawValue};
use tracing::{debug, warn};

use crate::csv::source_label;
use crate::error::{BatchSourceError, Result};

/// Reads every sheet of a workbook as raw records, in sheet order.
pub fn read_workbook_records(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(BatchSourceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let workbook_error = |message: String| BatchSourceError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let file_label = source_label(path);
    let mut records = Vec::new();

    for sheet in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| workbook_error(format!("sheet '{sheet}': {e}")))?;
        let source = format!("{file_label}#{sheet}");
        let sheet_records = range_to_records(&range, &source);
        if sheet_records.is_empty() {
            warn!(source = %source, "sheet has no data rows");
        } else {
            debug!(source = %source, records = sheet_records.len(), "loaded sheet");
        }
        records.extend(sheet_records);
    }

    Ok(records)
}

/// Converts one worksheet range into raw records.
pub fn range_to_records(range: &Range<Data>, source: &str) -> Vec<RawRecord> {
    let mut rows = range.rows().skip_while(|row| row.iter().all(is_empty_cell));
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        let mut record = RawRecord::new(idx + 1).with_source(source);
        for (header, cell) in headers.iter().zip(row) {
            if header.is_empty() {
                continue;
            }
            record.push(header.clone(), cell_to_raw(cell));
        }
        if !record.is_blank() {
            records.push(record);
        }
    }
    records
}

/// Maps a workbook cell onto a [`RawValue`].
///
/// Date-formatted cells come back as their day serial so the normalizer
/// decodes every date the same way.
pub fn cell_to_raw(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Missing,
        Data::Int(v) => RawValue::Int(*v),
        Data::Float(v) => RawValue::Float(*v),
        Data::Bool(v) => RawValue::Bool(*v),
        Data::String(s) => RawValue::Text(s.clone()),
        Data::DateTime(dt) => RawValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
    }
}

fn is_empty_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
