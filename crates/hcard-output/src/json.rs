//! Document-as-JSON renderer.

use hcard_model::Document;

use crate::error::RenderError;
use crate::renderer::Renderer;

/// Writes the laid-out document itself as pretty JSON.
///
/// Useful for inspecting layouts and for handing pages to an out-of-process
/// painter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentRenderer;

impl Renderer for JsonDocumentRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        let mut bytes = serde_json::to_vec_pretty(document)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use hcard_model::{BlockKind, Canvas, LayoutBlock, Rect, Section};

    use super::*;

    #[test]
    fn output_parses_back_into_the_same_document() {
        let mut document = Document::new(Canvas::A4);
        document.push(
            LayoutBlock::new(
                BlockKind::Text,
                Section::Comments,
                Rect::new(44.0, 392.0, 507.0, 40.0),
            )
            .with_text("Refer for eye examination"),
        );
        let bytes = JsonDocumentRenderer.render(&document).unwrap();
        let back: Document = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, document);
    }
}
