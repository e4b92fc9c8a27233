//! SVG page renderer.

use std::collections::BTreeMap;

use hcard_common::format_numeric;
use hcard_model::{BlockKind, Color, Document, FontWeight, LayoutBlock, Rect, TextAlign};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::RenderError;
use crate::renderer::Renderer;

/// SVG namespace.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Renders a document as a standalone SVG page.
///
/// Backgrounds are painted first so section headings stay visible above
/// them; every other block is painted in document order. Image blocks
/// resolve their asset key through the renderer's asset map; unknown keys
/// draw a dashed placeholder frame instead.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    /// Asset key to `href` (file path or URL).
    assets: BTreeMap<String, String>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_asset(mut self, key: impl Into<String>, href: impl Into<String>) -> Self {
        self.assets.insert(key.into(), href.into());
        self
    }

    pub fn asset(&self, key: &str) -> Option<&str> {
        self.assets.get(key).map(String::as_str)
    }

    fn write_document(&self, document: &Document) -> std::io::Result<Vec<u8>> {
        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let width = num(document.canvas.width);
        let height = num(document.canvas.height);
        let view_box = format!("0 0 {width} {height}");
        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NS));
        root.push_attribute(("width", width.as_str()));
        root.push_attribute(("height", height.as_str()));
        root.push_attribute(("viewBox", view_box.as_str()));
        root.push_attribute(("font-family", FONT_FAMILY));
        xml.write_event(Event::Start(root))?;

        let mut page = BytesStart::new("rect");
        page.push_attribute(("width", width.as_str()));
        page.push_attribute(("height", height.as_str()));
        page.push_attribute(("fill", "#ffffff"));
        xml.write_event(Event::Empty(page))?;

        let (backgrounds, foreground): (Vec<&LayoutBlock>, Vec<&LayoutBlock>) = document
            .blocks
            .iter()
            .partition(|block| block.kind == BlockKind::Background);
        for block in backgrounds.into_iter().chain(foreground) {
            self.write_block(&mut xml, block)?;
        }

        xml.write_event(Event::End(BytesEnd::new("svg")))?;
        Ok(xml.into_inner())
    }

    fn write_block(&self, xml: &mut Writer<Vec<u8>>, block: &LayoutBlock) -> std::io::Result<()> {
        let style = &block.style;
        match block.kind {
            BlockKind::Heading | BlockKind::Label | BlockKind::Value | BlockKind::Text => {
                if let Some(text) = block.text.as_deref() {
                    write_text(xml, block, text)?;
                }
            }
            BlockKind::Background => {
                let mut rect = rect_element(&block.rect);
                let fill = style.fill.map_or_else(|| "none".to_string(), Color::to_hex);
                rect.push_attribute(("fill", fill.as_str()));
                xml.write_event(Event::Empty(rect))?;
            }
            BlockKind::StrokedBox => {
                let mut rect = rect_element(&block.rect);
                let fill = style.fill.map_or_else(|| "none".to_string(), Color::to_hex);
                let stroke = style.stroke.unwrap_or(style.color).to_hex();
                let stroke_width = num(style.stroke_width);
                rect.push_attribute(("fill", fill.as_str()));
                rect.push_attribute(("stroke", stroke.as_str()));
                rect.push_attribute(("stroke-width", stroke_width.as_str()));
                xml.write_event(Event::Empty(rect))?;
            }
            BlockKind::Rule => {
                let r = &block.rect;
                let mut line = BytesStart::new("line");
                let (x1, y1, x2, y2) = (num(r.x), num(r.y), num(r.right()), num(r.bottom()));
                let stroke = style.stroke.unwrap_or(style.color).to_hex();
                let stroke_width = num(style.stroke_width);
                line.push_attribute(("x1", x1.as_str()));
                line.push_attribute(("y1", y1.as_str()));
                line.push_attribute(("x2", x2.as_str()));
                line.push_attribute(("y2", y2.as_str()));
                line.push_attribute(("stroke", stroke.as_str()));
                line.push_attribute(("stroke-width", stroke_width.as_str()));
                xml.write_event(Event::Empty(line))?;
            }
            BlockKind::Image => {
                match block.asset.as_deref().and_then(|key| self.asset(key)) {
                    Some(href) => {
                        let mut image = rect_element(&block.rect);
                        image.set_name(b"image");
                        image.push_attribute(("href", href));
                        image.push_attribute(("preserveAspectRatio", "xMidYMid meet"));
                        xml.write_event(Event::Empty(image))?;
                    }
                    None => {
                        let mut frame = rect_element(&block.rect);
                        frame.push_attribute(("fill", "none"));
                        frame.push_attribute(("stroke", "#999999"));
                        frame.push_attribute(("stroke-dasharray", "4 2"));
                        xml.write_event(Event::Empty(frame))?;
                    }
                }
            }
            BlockKind::LabelValue | BlockKind::Columns | BlockKind::Column => {}
        }
        for child in &block.children {
            self.write_block(xml, child)?;
        }
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        if let Some(block) = document
            .flatten()
            .into_iter()
            .find(|block| !is_finite(&block.rect))
        {
            return Err(RenderError::InvalidGeometry { kind: block.kind });
        }
        self.write_document(document)
            .map_err(|source| RenderError::Markup {
                format: "svg",
                source,
            })
    }
}

fn write_text(xml: &mut Writer<Vec<u8>>, block: &LayoutBlock, text: &str) -> std::io::Result<()> {
    let style = &block.style;
    let r = &block.rect;
    let (x, anchor) = match style.align {
        TextAlign::Start => (r.x, "start"),
        TextAlign::Middle => (r.x + r.width / 2.0, "middle"),
        TextAlign::End => (r.right(), "end"),
    };
    let x = num(x);
    let y = num(r.y + r.height / 2.0);
    let size = num(style.font_size);
    let fill = style.color.to_hex();

    let mut element = BytesStart::new("text");
    element.push_attribute(("x", x.as_str()));
    element.push_attribute(("y", y.as_str()));
    element.push_attribute(("font-size", size.as_str()));
    if style.weight == FontWeight::Bold {
        element.push_attribute(("font-weight", "bold"));
    }
    element.push_attribute(("fill", fill.as_str()));
    element.push_attribute(("text-anchor", anchor));
    element.push_attribute(("dominant-baseline", "middle"));
    xml.write_event(Event::Start(element))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}

fn rect_element(r: &Rect) -> BytesStart<'static> {
    let mut element = BytesStart::new("rect");
    element.push_attribute(("x", num(r.x).as_str()));
    element.push_attribute(("y", num(r.y).as_str()));
    element.push_attribute(("width", num(r.width).as_str()));
    element.push_attribute(("height", num(r.height).as_str()));
    element
}

fn is_finite(r: &Rect) -> bool {
    r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite()
}

fn num(value: f64) -> String {
    format_numeric(value)
}
