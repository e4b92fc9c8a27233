//! The page layout pass.
//!
//! One top-down walk over a fixed section order. A single cursor tracks the
//! next free `y`; two-column sections run one cursor per column from the
//! same start and rejoin at the lower of the two. Nothing here measures
//! text except through the [`RowHeightPolicy`], so the same record, canvas
//! and options always produce the same blocks.

use hcard_model::{
    BlockKind, BlockStyle, CanonicalHealthRecord, Canvas, Color, Document, FieldId, FontWeight,
    LayoutBlock, Rect, Section, TextAlign,
};
use tracing::trace;

use crate::metrics::{
    BODY_FONT_SIZE, CAPTION_GAP, CAPTION_HEIGHT, COLUMN_GAP, COMMENT_HEIGHT, COMMENTS_BACKGROUND,
    FOOTER_FONT_SIZE, FOOTER_GAP, FOOTER_LINE_HEIGHT, FOOTER_RULE_GAP, HEADER_HEIGHT,
    HEADING_FONT_SIZE, HEADING_HEIGHT, IDENTITY_BACKGROUND, LABEL_SHARE, LOGO_GAP, LOGO_SIZE,
    ROW_HEIGHT, SECTION_GAP, SECTION_PADDING, SIGNATURE_BOX_HEIGHT, SIGNATURE_RULE_OFFSET,
    SIGNATURES_BACKGROUND, TITLE_FONT_SIZE, TITLE_HEIGHT, VISION_BACKGROUND, VITALS_BACKGROUND,
};
use crate::options::{DEFAULT_PLACEHOLDER, LayoutOptions};
use crate::row_height::{FixedRowHeight, RowHeightPolicy};

const IDENTITY_LEFT: &[FieldId] = &[
    FieldId::Name,
    FieldId::GradeClass,
    FieldId::Gender,
    FieldId::School,
];
const IDENTITY_RIGHT: &[FieldId] = &[
    FieldId::Section,
    FieldId::AssistId,
    FieldId::ParentName,
    FieldId::AssessmentDate,
];
const VITALS_LEFT: &[FieldId] = &[FieldId::Height, FieldId::Weight, FieldId::Bmi];
const VITALS_RIGHT: &[FieldId] = &[FieldId::Temperature, FieldId::PulseRate, FieldId::Spo2];

const CAPTION_COLOR: Color = Color(0x55, 0x55, 0x55);

/// Lays out `record` with default options and fixed row heights.
///
/// # Examples
///
/// ```
/// use hcard_layout::layout;
/// use hcard_model::{Canvas, CanonicalHealthRecord, Section};
///
/// let document = layout(&CanonicalHealthRecord::new(), &Canvas::A4);
/// assert_eq!(document.sections().first(), Some(&Section::Header));
/// ```
pub fn layout(record: &CanonicalHealthRecord, canvas: &Canvas) -> Document {
    LayoutEngine::new(LayoutOptions::default()).layout(record, canvas)
}

/// Layout pass configured with page options and a row-height policy.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine<P = FixedRowHeight> {
    options: LayoutOptions,
    policy: P,
}

impl LayoutEngine<FixedRowHeight> {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            policy: FixedRowHeight,
        }
    }
}

impl<P: RowHeightPolicy> LayoutEngine<P> {
    /// Replaces the row-height policy.
    pub fn with_policy<Q: RowHeightPolicy>(self, policy: Q) -> LayoutEngine<Q> {
        LayoutEngine {
            options: self.options,
            policy,
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Computes the page for one record.
    ///
    /// Sections are emitted in a fixed order: header, identity, vitals,
    /// vision, comments (only when the record has one), signatures, footer.
    /// Each section contributes its heading, then its background, then its
    /// content. The footer sits [`FOOTER_GAP`] below the last section, not at
    /// the page bottom; content past the page end is left for
    /// [`check_bounds`](crate::check_bounds) to report.
    pub fn layout(&self, record: &CanonicalHealthRecord, canvas: &Canvas) -> Document {
        let mut page = Page::new(canvas, &self.options, &self.policy);

        page.header();

        let (identity_left, identity_right) = self.identity_columns();
        page.two_column_section(
            Section::Identity,
            IDENTITY_BACKGROUND,
            &identity_left,
            identity_right,
            record,
        );
        page.two_column_section(
            Section::Vitals,
            VITALS_BACKGROUND,
            VITALS_LEFT,
            VITALS_RIGHT,
            record,
        );
        page.two_column_section(
            Section::Vision,
            VISION_BACKGROUND,
            &[FieldId::LeftEye],
            &[FieldId::RightEye],
            record,
        );
        if record.has_comment() {
            page.comments(record);
        }
        page.signatures();
        page.footer();

        let document = page.finish();
        trace!(
            blocks = document.blocks.len(),
            bottom = document.content_bottom(),
            "layout complete"
        );
        document
    }

    fn identity_columns(&self) -> (Vec<FieldId>, &'static [FieldId]) {
        let mut left = IDENTITY_LEFT.to_vec();
        if self.options.show_parent_contact {
            left.push(FieldId::ParentContact);
        }
        (left, IDENTITY_RIGHT)
    }
}

/// Cursor state for one document.
struct Page<'a, P> {
    options: &'a LayoutOptions,
    policy: &'a P,
    document: Document,
    left: f64,
    width: f64,
    y: f64,
    /// Bottom edge of the most recent section.
    last_bottom: f64,
}

impl<'a, P: RowHeightPolicy> Page<'a, P> {
    fn new(canvas: &Canvas, options: &'a LayoutOptions, policy: &'a P) -> Self {
        let content = canvas.content_rect();
        Self {
            options,
            policy,
            document: Document::new(*canvas),
            left: content.x,
            width: content.width,
            y: content.y,
            last_bottom: content.y,
        }
    }

    fn finish(self) -> Document {
        self.document
    }

    fn column_width(&self) -> f64 {
        ((self.width - 2.0 * SECTION_PADDING - COLUMN_GAP) / 2.0).max(0.0)
    }

    fn column_lefts(&self) -> (f64, f64) {
        let left = self.left + SECTION_PADDING;
        (left, left + self.column_width() + COLUMN_GAP)
    }

    fn header(&mut self) {
        let top = self.y;
        if let Some(asset) = &self.options.logo_asset {
            self.document.push(
                LayoutBlock::new(
                    BlockKind::Image,
                    Section::Header,
                    Rect::new(self.left, top, LOGO_SIZE, LOGO_SIZE),
                )
                .with_asset(asset.clone()),
            );
        }
        let title_left = self.left + LOGO_SIZE + LOGO_GAP;
        self.document.push(
            LayoutBlock::new(
                BlockKind::Heading,
                Section::Header,
                Rect::new(
                    title_left,
                    top + (LOGO_SIZE - TITLE_HEIGHT) / 2.0,
                    (self.width - LOGO_SIZE - LOGO_GAP).max(0.0),
                    TITLE_HEIGHT,
                ),
            )
            .with_style(BlockStyle {
                color: self.options.accent,
                font_size: TITLE_FONT_SIZE,
                weight: FontWeight::Bold,
                ..BlockStyle::default()
            })
            .with_text(self.options.title.clone()),
        );
        self.y = top + HEADER_HEIGHT;
        self.last_bottom = self.y;
    }

    fn two_column_section(
        &mut self,
        section: Section,
        background_height: f64,
        left_fields: &[FieldId],
        right_fields: &[FieldId],
        record: &CanonicalHealthRecord,
    ) {
        let top = self.y;
        let rows_top = top + HEADING_HEIGHT;
        let width = self.column_width();
        let (left_x, right_x) = self.column_lefts();

        let (left, left_bottom) = self.column(section, left_x, rows_top, width, left_fields, record);
        let (right, right_bottom) =
            self.column(section, right_x, rows_top, width, right_fields, record);
        let content_bottom = left_bottom.max(right_bottom);

        let columns = LayoutBlock::new(
            BlockKind::Columns,
            section,
            Rect::new(
                left_x,
                rows_top,
                2.0 * width + COLUMN_GAP,
                content_bottom - rows_top,
            ),
        )
        .with_children(vec![left, right]);

        self.emit_section(section, top, background_height, content_bottom, vec![columns]);
    }

    /// Stacks label/value rows from `top`; returns the column and its bottom.
    fn column(
        &self,
        section: Section,
        x: f64,
        top: f64,
        width: f64,
        fields: &[FieldId],
        record: &CanonicalHealthRecord,
    ) -> (LayoutBlock, f64) {
        let mut cursor = top;
        let mut rows = Vec::with_capacity(fields.len());
        for &field in fields {
            let value = self.value_text(record, field);
            let height = self
                .policy
                .row_height(field, &value, width)
                .max(ROW_HEIGHT);
            rows.push(self.label_value(
                section,
                field.label(),
                value,
                Rect::new(x, cursor, width, height),
            ));
            cursor += height;
        }
        let column = LayoutBlock::new(
            BlockKind::Column,
            section,
            Rect::new(x, top, width, cursor - top),
        )
        .with_children(rows);
        (column, cursor)
    }

    fn label_value(&self, section: Section, label: &str, value: String, rect: Rect) -> LayoutBlock {
        let label_width = rect.width * LABEL_SHARE;
        let label_block = LayoutBlock::new(
            BlockKind::Label,
            section,
            Rect::new(rect.x, rect.y, label_width, rect.height),
        )
        .with_style(BlockStyle {
            color: self.options.accent,
            weight: FontWeight::Bold,
            font_size: BODY_FONT_SIZE,
            ..BlockStyle::default()
        })
        .with_text(label);
        let value_block = LayoutBlock::new(
            BlockKind::Value,
            section,
            Rect::new(
                rect.x + label_width,
                rect.y,
                rect.width - label_width,
                rect.height,
            ),
        )
        .with_style(BlockStyle {
            color: Color::BLACK,
            font_size: BODY_FONT_SIZE,
            ..BlockStyle::default()
        })
        .with_text(value);
        LayoutBlock::new(BlockKind::LabelValue, section, rect)
            .with_children(vec![label_block, value_block])
    }

    /// Display text for a field; the missing marker never renders blank.
    fn value_text(&self, record: &CanonicalHealthRecord, field: FieldId) -> String {
        let placeholder = if self.options.placeholder.trim().is_empty() {
            DEFAULT_PLACEHOLDER
        } else {
            self.options.placeholder.as_str()
        };
        record
            .get(field)
            .display_or(placeholder, &self.options.date_format)
    }

    fn comments(&mut self, record: &CanonicalHealthRecord) {
        let top = self.y;
        let text_top = top + HEADING_HEIGHT;
        let text = LayoutBlock::new(
            BlockKind::Text,
            Section::Comments,
            Rect::new(
                self.left + SECTION_PADDING,
                text_top,
                (self.width - 2.0 * SECTION_PADDING).max(0.0),
                COMMENT_HEIGHT,
            ),
        )
        .with_style(BlockStyle {
            font_size: BODY_FONT_SIZE,
            ..BlockStyle::default()
        })
        .with_text(self.value_text(record, FieldId::Comment));
        self.emit_section(
            Section::Comments,
            top,
            COMMENTS_BACKGROUND,
            text_top + COMMENT_HEIGHT,
            vec![text],
        );
    }

    fn signatures(&mut self) {
        let top = self.y;
        let box_top = top + HEADING_HEIGHT;
        let width = self.column_width();
        let (left_x, right_x) = self.column_lefts();

        let boxes: Vec<LayoutBlock> = [left_x, right_x]
            .into_iter()
            .zip(&self.options.signature_captions)
            .map(|(x, caption)| self.signature_box(x, box_top, width, caption))
            .collect();
        self.emit_section(
            Section::Signatures,
            top,
            SIGNATURES_BACKGROUND,
            box_top + SIGNATURE_BOX_HEIGHT,
            boxes,
        );
    }

    fn signature_box(&self, x: f64, top: f64, width: f64, caption: &str) -> LayoutBlock {
        let inner_x = x + SECTION_PADDING;
        let inner_width = (width - 2.0 * SECTION_PADDING).max(0.0);
        let rule_y = top + SIGNATURE_RULE_OFFSET;
        let rule = LayoutBlock::new(
            BlockKind::Rule,
            Section::Signatures,
            Rect::new(inner_x, rule_y, inner_width, 0.0),
        )
        .with_style(BlockStyle {
            stroke: Some(Color::BLACK),
            stroke_width: 0.75,
            ..BlockStyle::default()
        });
        let caption = LayoutBlock::new(
            BlockKind::Text,
            Section::Signatures,
            Rect::new(inner_x, rule_y + CAPTION_GAP, inner_width, CAPTION_HEIGHT),
        )
        .with_style(BlockStyle {
            color: CAPTION_COLOR,
            font_size: FOOTER_FONT_SIZE,
            align: TextAlign::Middle,
            ..BlockStyle::default()
        })
        .with_text(caption);
        LayoutBlock::new(
            BlockKind::StrokedBox,
            Section::Signatures,
            Rect::new(x, top, width, SIGNATURE_BOX_HEIGHT),
        )
        .with_style(BlockStyle {
            stroke: Some(self.options.accent),
            stroke_width: 1.0,
            ..BlockStyle::default()
        })
        .with_children(vec![rule, caption])
    }

    fn footer(&mut self) {
        let top = self.last_bottom + FOOTER_GAP;
        self.document.push(
            LayoutBlock::new(
                BlockKind::Rule,
                Section::Footer,
                Rect::new(self.left, top, self.width, 0.0),
            )
            .with_style(BlockStyle {
                stroke: Some(self.options.accent),
                stroke_width: 1.0,
                ..BlockStyle::default()
            }),
        );
        let mut line_top = top + FOOTER_RULE_GAP;
        for line in self.options.footer_lines() {
            self.document.push(
                LayoutBlock::new(
                    BlockKind::Text,
                    Section::Footer,
                    Rect::new(self.left, line_top, self.width, FOOTER_LINE_HEIGHT),
                )
                .with_style(BlockStyle {
                    color: CAPTION_COLOR,
                    font_size: FOOTER_FONT_SIZE,
                    align: TextAlign::Middle,
                    ..BlockStyle::default()
                })
                .with_text(line),
            );
            line_top += FOOTER_LINE_HEIGHT;
        }
        self.y = line_top;
        self.last_bottom = line_top;
    }

    /// Pushes heading, background and content, then moves the cursor past
    /// the section.
    ///
    /// The background keeps its fixed height unless the content reaches
    /// further down, in which case it grows to cover it.
    fn emit_section(
        &mut self,
        section: Section,
        top: f64,
        background_height: f64,
        content_bottom: f64,
        content: Vec<LayoutBlock>,
    ) {
        let extent = background_height.max(content_bottom - top);
        self.document.push(
            LayoutBlock::new(
                BlockKind::Heading,
                section,
                Rect::new(self.left, top, self.width, HEADING_HEIGHT),
            )
            .with_style(BlockStyle {
                color: self.options.accent,
                font_size: HEADING_FONT_SIZE,
                weight: FontWeight::Bold,
                ..BlockStyle::default()
            })
            .with_text(section.title()),
        );
        self.document.push(
            LayoutBlock::new(
                BlockKind::Background,
                section,
                Rect::new(self.left, top, self.width, extent),
            )
            .with_style(BlockStyle {
                fill: Some(self.options.background),
                ..BlockStyle::default()
            }),
        );
        for block in content {
            self.document.push(block);
        }
        self.last_bottom = top + extent;
        self.y = self.last_bottom + SECTION_GAP;
    }
}
