use hcard_model::{BlockKind, Rect, Section};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Content does not fit on the single page.
    #[error(
        "{kind:?} block in {section} section at y={top:.1}..{bottom:.1} leaves the page content area (bottom {limit:.1})",
        top = .rect.y,
        bottom = .rect.bottom()
    )]
    OutOfBounds {
        section: Section,
        kind: BlockKind,
        rect: Rect,
        limit: f64,
    },
    #[error("{first:?} and {second:?} blocks overlap in {section} section")]
    Overlap {
        section: Section,
        first: BlockKind,
        second: BlockKind,
    },
}
