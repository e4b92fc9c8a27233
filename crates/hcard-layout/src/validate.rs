//! Page invariants checked after layout.

use hcard_model::{BlockKind, Document, LayoutBlock};

use crate::error::LayoutError;

/// Fails when any block, at any depth, leaves the canvas content area.
///
/// The page is a single fixed canvas; a record whose content runs past the
/// bottom margin cannot be rendered as laid out.
pub fn check_bounds(document: &Document) -> Result<(), LayoutError> {
    match document.first_out_of_bounds() {
        Some(block) => Err(LayoutError::OutOfBounds {
            section: block.section,
            kind: block.kind,
            rect: block.rect,
            limit: document.canvas.content_rect().bottom(),
        }),
        None => Ok(()),
    }
}

/// Fails when two drawn blocks of the same section overlap.
///
/// Only leaf blocks are compared. Backgrounds sit behind their section by
/// design and containers enclose their own children.
pub fn check_overlaps(document: &Document) -> Result<(), LayoutError> {
    for section in document.sections() {
        let leaves: Vec<&LayoutBlock> = document
            .section_blocks(section)
            .into_iter()
            .flat_map(LayoutBlock::walk)
            .filter(|block| block.children.is_empty() && block.kind != BlockKind::Background)
            .collect();
        for (idx, first) in leaves.iter().enumerate() {
            if let Some(second) = leaves[idx + 1..]
                .iter()
                .find(|other| first.rect.overlaps(&other.rect))
            {
                return Err(LayoutError::Overlap {
                    section,
                    first: first.kind,
                    second: second.kind,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hcard_model::{Canvas, Rect, Section};

    use super::*;

    #[test]
    fn overlapping_leaves_are_reported() {
        let mut document = Document::new(Canvas::A4);
        document.push(LayoutBlock::new(
            BlockKind::Text,
            Section::Comments,
            Rect::new(40.0, 100.0, 100.0, 20.0),
        ));
        document.push(LayoutBlock::new(
            BlockKind::Background,
            Section::Comments,
            Rect::new(36.0, 90.0, 300.0, 60.0),
        ));
        assert!(check_overlaps(&document).is_ok());

        document.push(LayoutBlock::new(
            BlockKind::Text,
            Section::Comments,
            Rect::new(60.0, 110.0, 100.0, 20.0),
        ));
        assert_eq!(
            check_overlaps(&document),
            Err(LayoutError::Overlap {
                section: Section::Comments,
                first: BlockKind::Text,
                second: BlockKind::Text,
            })
        );
    }

    #[test]
    fn bounds_error_names_the_offending_block() {
        let mut document = Document::new(Canvas::new(200.0, 100.0, 10.0));
        document.push(LayoutBlock::new(
            BlockKind::Rule,
            Section::Footer,
            Rect::new(10.0, 95.0, 180.0, 0.0),
        ));
        let err = check_bounds(&document).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::OutOfBounds { section: Section::Footer, limit, .. } if limit == 90.0
        ));
    }
}
