//! Canonical records as JSON and CSV.
//!
//! Both forms list fields in canonical order under their snake_case
//! names. In CSV the missing marker is an empty cell and dates are ISO
//! `YYYY-MM-DD`; in JSON the missing marker is `null`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hcard_model::{CanonicalHealthRecord, FieldId};
use tracing::debug;

use crate::error::InterchangeError;
use crate::files::ensure_parent_dir;

/// Writes records as a pretty JSON array.
pub fn write_records_json(
    path: &Path,
    records: &[CanonicalHealthRecord],
) -> Result<(), InterchangeError> {
    let mut writer = create(path)?;
    records_to_json(&mut writer, records)?;
    writer.flush()?;
    debug!(path = %path.display(), records = records.len(), "wrote JSON records");
    Ok(())
}

/// Writes records as CSV with one column per canonical field.
pub fn write_records_csv(
    path: &Path,
    records: &[CanonicalHealthRecord],
) -> Result<(), InterchangeError> {
    let writer = create(path)?;
    records_to_csv(writer, records)?;
    debug!(path = %path.display(), records = records.len(), "wrote CSV records");
    Ok(())
}

pub fn records_to_json<W: Write>(
    mut writer: W,
    records: &[CanonicalHealthRecord],
) -> Result<(), InterchangeError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    Ok(())
}

pub fn records_to_csv<W: Write>(
    writer: W,
    records: &[CanonicalHealthRecord],
) -> Result<(), InterchangeError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(FieldId::ALL.iter().map(FieldId::as_str))?;
    for record in records {
        csv.write_record(record.iter().map(|(_, value)| value.to_string()))?;
    }
    csv.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, InterchangeError> {
    let create_error = |source| InterchangeError::Create {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).map_err(create_error)?;
    let file = File::create(path).map_err(create_error)?;
    Ok(BufWriter::new(file))
}
