//! Fixed page metrics, in points.

/// Logo plus title band at the top of the page.
pub const HEADER_HEIGHT: f64 = 72.0;
pub const LOGO_SIZE: f64 = 56.0;
pub const TITLE_HEIGHT: f64 = 24.0;

pub const HEADING_HEIGHT: f64 = 18.0;
pub const ROW_HEIGHT: f64 = 20.0;
/// Horizontal inset of section content from the background edge.
pub const SECTION_PADDING: f64 = 8.0;
pub const COLUMN_GAP: f64 = 12.0;
pub const SECTION_GAP: f64 = 12.0;

pub const COMMENT_HEIGHT: f64 = 40.0;
pub const SIGNATURE_BOX_HEIGHT: f64 = 72.0;
/// Distance from a signature box's top to its signing line.
pub const SIGNATURE_RULE_OFFSET: f64 = 48.0;
pub const CAPTION_HEIGHT: f64 = 14.0;

pub const FOOTER_GAP: f64 = 16.0;
pub const FOOTER_LINE_HEIGHT: f64 = 14.0;

/// Share of a label/value pair's width given to the label.
pub const LABEL_SHARE: f64 = 0.45;

pub const HEADING_FONT_SIZE: f64 = 12.0;
pub const TITLE_FONT_SIZE: f64 = 18.0;
pub const BODY_FONT_SIZE: f64 = 10.0;
pub const FOOTER_FONT_SIZE: f64 = 8.0;

/// Space between the logo and the title text.
pub const LOGO_GAP: f64 = 12.0;
/// Space between the footer rule and the first footer line.
pub const FOOTER_RULE_GAP: f64 = 4.0;
/// Space between a signing line and its caption.
pub const CAPTION_GAP: f64 = 4.0;

// Section background heights. Fixed regardless of content; a section
// whose rows need more room grows past its background.
pub const IDENTITY_BACKGROUND: f64 = 100.0;
pub const VITALS_BACKGROUND: f64 = 80.0;
pub const VISION_BACKGROUND: f64 = 50.0;
pub const COMMENTS_BACKGROUND: f64 = 60.0;
pub const SIGNATURES_BACKGROUND: f64 = 100.0;
