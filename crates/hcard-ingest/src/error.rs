//! Error types for batch source reading.

use std::path::PathBuf;
use thiserror::Error;

/// The batch source cannot be read. Always fatal for the run.
#[derive(Debug, Error)]
pub enum BatchSourceError {
    // === File System Errors ===
    /// Input path does not exist.
    #[error("input not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a supported source format.
    #[error("unsupported input format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// File uses an unsupported text encoding.
    #[error("unsupported encoding {encoding} in {path}: convert the file to UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON source is not an array of objects.
    #[error("expected a JSON array of objects in {path}: {reason}")]
    JsonShape { path: PathBuf, reason: String },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for BatchSourceError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub(crate) fn open_error(path: &std::path::Path, err: std::io::Error) -> BatchSourceError {
    if err.kind() == std::io::ErrorKind::NotFound {
        BatchSourceError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        BatchSourceError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Result type for source reading.
pub type Result<T> = std::result::Result<T, BatchSourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BatchSourceError::UnsupportedFormat {
            path: PathBuf::from("/data/students.pdf"),
            extension: "pdf".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported input format 'pdf' for /data/students.pdf"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Name".into());
        let err: BatchSourceError = polars_err.into();
        assert!(matches!(err, BatchSourceError::DataFrame { .. }));
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = open_error(std::path::Path::new("gone.csv"), io);
        assert!(matches!(err, BatchSourceError::FileNotFound { .. }));
    }
}
