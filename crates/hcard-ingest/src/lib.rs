//! Batch source reading.
//!
//! Turns input files into [`RawRecord`](hcard_model::RawRecord)s without
//! interpreting headers: CSV and TSV through Polars, workbooks (xlsx, xls,
//! ods) through calamine, and JSON arrays of objects.
//!
//! Any failure here is a [`BatchSourceError`]: there is nothing to iterate,
//! so the whole run stops.

mod csv;
mod discovery;
mod error;
mod json;
mod workbook;

use std::path::{Path, PathBuf};

use hcard_model::RawRecord;
use tracing::info_span;

pub use csv::{
    any_value_to_raw, dataframe_to_records, read_delimited_records, read_delimited_table,
    validate_encoding,
};
pub use discovery::{SourceFormat, expand_inputs, list_source_files};
pub use error::{BatchSourceError, Result};
pub use json::{json_to_records, json_value_to_raw, read_json_records};
pub use workbook::{cell_to_raw, range_to_records, read_workbook_records};

/// Reads one source file, dispatching on its extension.
pub fn read_source(path: &Path) -> Result<Vec<RawRecord>> {
    let format = SourceFormat::from_path(path).ok_or_else(|| {
        BatchSourceError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string(),
        }
    })?;
    let span = info_span!("read_source", path = %path.display(), format = format.as_str());
    let _guard = span.enter();

    match format {
        SourceFormat::Csv => read_delimited_records(path, b','),
        SourceFormat::Tsv => read_delimited_records(path, b'\t'),
        SourceFormat::Workbook => read_workbook_records(path),
        SourceFormat::Json => read_json_records(path),
    }
}

/// Reads every input in order; directories contribute their source files.
pub fn read_sources(inputs: &[PathBuf]) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    for path in expand_inputs(inputs)? {
        let loaded = read_source(&path)?;
        tracing::info!(path = %path.display(), records = loaded.len(), "source loaded");
        records.extend(loaded);
    }
    Ok(records)
}
