//! Error types for rendering and interchange output.

use std::path::PathBuf;

use hcard_model::BlockKind;
use thiserror::Error;

/// A renderer could not turn a document into an artifact.
///
/// Per-record: the batch records it and moves on.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {format} markup: {source}")]
    Markup {
        format: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A block carries a coordinate or extent that cannot be drawn.
    #[error("{kind:?} block has non-finite geometry")]
    InvalidGeometry { kind: BlockKind },

    /// Failure reported by an external rendering backend.
    #[error("{renderer} renderer failed: {message}")]
    Backend { renderer: String, message: String },
}

/// Normalized records could not be written out.
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_names_renderer() {
        let err = RenderError::Backend {
            renderer: "pdf".to_string(),
            message: "font missing".to_string(),
        };
        assert_eq!(err.to_string(), "pdf renderer failed: font missing");
    }
}
