//! Delimited text sources loaded through Polars.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hcard_model::{RawRecord, RawValue};
use polars::prelude::*;
use tracing::debug;

use crate::error::{BatchSourceError, Result, open_error};

/// Rows sampled for column type inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Rejects files starting with a UTF-16 byte order mark. A UTF-8 BOM is
/// accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| BatchSourceError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(BatchSourceError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(BatchSourceError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads a delimited file into a Polars DataFrame.
pub fn read_delimited_table(path: &Path, separator: u8) -> Result<DataFrame> {
    validate_encoding(path)?;

    let parse_error = |e: PolarsError| BatchSourceError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|opts| opts.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)
}

/// Reads a delimited file as raw records, one per non-blank data row.
pub fn read_delimited_records(path: &Path, separator: u8) -> Result<Vec<RawRecord>> {
    let df = read_delimited_table(path, separator)?;
    let source = source_label(path);
    let records = dataframe_to_records(&df, &source)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        records = records.len(),
        "loaded delimited source"
    );
    Ok(records)
}

/// Converts every DataFrame row into a [`RawRecord`], skipping blank rows.
///
/// Row numbers are 1-based over data rows, so skipped rows leave gaps.
pub fn dataframe_to_records(df: &DataFrame, source: &str) -> Result<Vec<RawRecord>> {
    let columns = df.get_columns();
    let headers: Vec<String> = columns
        .iter()
        .map(|c| c.name().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut record = RawRecord::new(idx + 1).with_source(source);
        for (header, column) in headers.iter().zip(columns) {
            let value = column.get(idx)?;
            record.push(header.clone(), any_value_to_raw(value));
        }
        if !record.is_blank() {
            records.push(record);
        }
    }
    Ok(records)
}

/// Maps a Polars cell onto a [`RawValue`] without losing numeric type.
pub fn any_value_to_raw(value: AnyValue<'_>) -> RawValue {
    match value {
        AnyValue::Null => RawValue::Missing,
        AnyValue::Boolean(b) => RawValue::Bool(b),
        AnyValue::Int8(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int16(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int32(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int64(v) => RawValue::Int(v),
        AnyValue::UInt8(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => RawValue::Int(v),
            Err(_) => RawValue::Float(v as f64),
        },
        AnyValue::Float32(v) => RawValue::Float(f64::from(v)),
        AnyValue::Float64(v) => RawValue::Float(v),
        AnyValue::String(s) => RawValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => RawValue::Text(s.to_string()),
        other => RawValue::Text(display_unquoted(&other)),
    }
}

/// Display text for cell types without a direct mapping (dates, decimals).
fn display_unquoted(value: &AnyValue<'_>) -> String {
    let text = value.to_string();
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map_or_else(|| text.clone(), str::to_string)
}

pub(crate) fn source_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string)
}
