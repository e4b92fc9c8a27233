//! Report output for Health Card Studio.
//!
//! - **renderer**: the [`Renderer`] seam a page painter plugs into
//! - **svg** / **json**: the bundled renderers
//! - **interchange**: canonical records as JSON and CSV
//! - **files**: artifact naming and output directories

mod error;
mod files;
mod interchange;
mod json;
mod renderer;
mod svg;

pub use error::{InterchangeError, RenderError};
pub use files::{
    EMPTY_STEM, INTERCHANGE_DIR, artifact_path, ensure_output_dir, ensure_parent_dir,
    interchange_path, sanitize_file_stem, write_artifact,
};
pub use interchange::{records_to_csv, records_to_json, write_records_csv, write_records_json};
pub use json::JsonDocumentRenderer;
pub use renderer::Renderer;
pub use svg::{SVG_NS, SvgRenderer};
