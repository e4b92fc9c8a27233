//! Positioned page content.
//!
//! A [`Document`] is the hand-off between the layout engine and a renderer:
//! an ordered list of [`LayoutBlock`]s on a fixed [`Canvas`]. Coordinates are
//! page units (points) with the origin at the top-left corner and `y`
//! growing downwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Axis-aligned rectangle in page units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the interiors of both rectangles intersect.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle (edges included).
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Fixed-size page canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Canvas {
    /// ISO A4 portrait in points.
    pub const A4: Canvas = Canvas {
        width: 595.0,
        height: 842.0,
        margin: 36.0,
    };

    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// The drawable area: the page minus its margins.
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.margin,
            self.margin,
            (self.width - 2.0 * self.margin).max(0.0),
            (self.height - 2.0 * self.margin).max(0.0),
        )
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        self.content_rect().contains(rect)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::A4
    }
}

/// 24-bit RGB colour, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ModelError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ModelError::InvalidColor(s.to_string()))
        };
        Ok(Color(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Start,
    Middle,
    End,
}

/// Visual attributes of a block. Renderers ignore fields that do not apply
/// to the block's kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockStyle {
    pub color: Color,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub font_size: f64,
    pub weight: FontWeight,
    pub align: TextAlign,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            font_size: 10.0,
            weight: FontWeight::Regular,
            align: TextAlign::Start,
        }
    }
}

/// What a block draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Section or page title text.
    Heading,
    /// Container pairing a [`BlockKind::Label`] child with a [`BlockKind::Value`] child.
    LabelValue,
    Label,
    Value,
    /// Free text line.
    Text,
    /// Filled rectangle behind a section.
    Background,
    /// Outlined rectangle.
    StrokedBox,
    /// Straight line from the rect's top-left to its bottom-right corner.
    Rule,
    /// Image asset placed at fixed coordinates.
    Image,
    /// Two-column grouping; children are [`BlockKind::Column`] blocks.
    Columns,
    Column,
}

impl BlockKind {
    /// Containers only group children and draw nothing themselves.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockKind::LabelValue | BlockKind::Columns | BlockKind::Column
        )
    }
}

/// Report section a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Header,
    Identity,
    Vitals,
    Vision,
    Comments,
    Signatures,
    Footer,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Identity => "identity",
            Section::Vitals => "vitals",
            Section::Vision => "vision",
            Section::Comments => "comments",
            Section::Signatures => "signatures",
            Section::Footer => "footer",
        }
    }

    /// Heading text printed above the section.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Header => "",
            Section::Identity => "Student Details",
            Section::Vitals => "Vitals",
            Section::Vision => "Vision",
            Section::Comments => "Comments",
            Section::Signatures => "Signatures",
            Section::Footer => "",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(Section::Header),
            "identity" => Ok(Section::Identity),
            "vitals" => Ok(Section::Vitals),
            "vision" => Ok(Section::Vision),
            "comments" => Ok(Section::Comments),
            "signatures" => Ok(Section::Signatures),
            "footer" => Ok(Section::Footer),
            _ => Err(ModelError::UnknownSection(s.to_string())),
        }
    }
}

/// A positioned content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub kind: BlockKind,
    pub section: Section,
    pub rect: Rect,
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Asset key for [`BlockKind::Image`] blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutBlock>,
}

impl LayoutBlock {
    pub fn new(kind: BlockKind, section: Section, rect: Rect) -> Self {
        Self {
            kind,
            section,
            rect,
            style: BlockStyle::default(),
            text: None,
            asset: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: BlockStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<LayoutBlock>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first walk: this block, then its descendants in order.
    pub fn walk(&self) -> Vec<&LayoutBlock> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// One page of positioned content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub canvas: Canvas,
    pub blocks: Vec<LayoutBlock>,
}

impl Document {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: LayoutBlock) {
        self.blocks.push(block);
    }

    /// Every block including nested children, depth-first in document order.
    pub fn flatten(&self) -> Vec<&LayoutBlock> {
        self.blocks.iter().flat_map(LayoutBlock::walk).collect()
    }

    /// Top-level blocks of one section, in order.
    pub fn section_blocks(&self, section: Section) -> Vec<&LayoutBlock> {
        self.blocks
            .iter()
            .filter(|block| block.section == section)
            .collect()
    }

    /// Sections in the order they first appear.
    pub fn sections(&self) -> Vec<Section> {
        let mut out: Vec<Section> = Vec::new();
        for block in &self.blocks {
            if out.last() != Some(&block.section) && !out.contains(&block.section) {
                out.push(block.section);
            }
        }
        out
    }

    /// Lowest point reached by any block.
    pub fn content_bottom(&self) -> f64 {
        self.flatten()
            .iter()
            .map(|block| block.rect.bottom())
            .fold(0.0, f64::max)
    }

    /// First block, at any depth, that leaves the canvas content rectangle.
    pub fn first_out_of_bounds(&self) -> Option<&LayoutBlock> {
        let content = self.canvas.content_rect();
        self.flatten()
            .into_iter()
            .find(|block| !content.contains(&block.rect))
    }

    /// Text of the value block paired with `label`, if present.
    pub fn value_for_label(&self, label: &str) -> Option<&str> {
        self.flatten()
            .into_iter()
            .filter(|block| block.kind == BlockKind::LabelValue)
            .find(|pair| {
                pair.children
                    .first()
                    .and_then(|child| child.text.as_deref())
                    == Some(label)
            })
            .and_then(|pair| pair.children.get(1))
            .and_then(|value| value.text.as_deref())
    }
}
