//! The seam between layout and whatever paints pages.

use hcard_model::Document;

use crate::error::RenderError;

/// Turns a laid-out [`Document`] into artifact bytes.
///
/// Implementations must support positioned text (size, weight, colour,
/// alignment), filled and stroked rectangles, ruled lines and images at
/// fixed coordinates. Renderers are shared across worker threads.
pub trait Renderer: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// File extension of produced artifacts, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        (**self).render(document)
    }
}

impl<R: Renderer + ?Sized> Renderer for std::sync::Arc<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        (**self).render(document)
    }
}
