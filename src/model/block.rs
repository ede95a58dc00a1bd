//! Positioned text: spans, lines and layout blocks.

use super::VisualStyle;
use serde::{Deserialize, Serialize};

/// Span flag: superscript.
pub const SPAN_FLAG_SUPERSCRIPT: u32 = 1 << 0;
/// Span flag: italic face.
pub const SPAN_FLAG_ITALIC: u32 = 1 << 1;
/// Span flag: serif face.
pub const SPAN_FLAG_SERIF: u32 = 1 << 2;
/// Span flag: monospaced face.
pub const SPAN_FLAG_MONOSPACE: u32 = 1 << 3;
/// Span flag: bold face.
pub const SPAN_FLAG_BOLD: u32 = 1 << 4;

/// Axis-aligned rectangle in top-down page coordinates.
///
/// `y0` is the top edge and grows downward, so smaller `y0` means higher on
/// the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// The smallest text-bearing unit: one run of text in one font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Text as decoded, untrimmed
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Style flag bitmask (`SPAN_FLAG_*`)
    pub flags: u32,
    /// Bold, decoded from `flags` once at construction
    pub bold: bool,
    /// Position on the page
    pub bbox: BBox,
}

impl Span {
    /// Create a span from its style-flag bitmask.
    pub fn new(text: impl Into<String>, size: f32, font_name: impl Into<String>, flags: u32) -> Self {
        Self {
            text: text.into(),
            size,
            font_name: font_name.into(),
            flags,
            bold: flags & SPAN_FLAG_BOLD != 0,
            bbox: BBox::default(),
        }
    }

    /// Set the span's position.
    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Whether the span carries any visible text.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn is_italic(&self) -> bool {
        self.flags & SPAN_FLAG_ITALIC != 0
    }

    /// Classification key of this span.
    pub fn style(&self) -> VisualStyle {
        VisualStyle::new(self.size, self.bold, self.font_name.clone())
    }
}

/// One visual line: spans in left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Concatenated text of the non-blank spans.
    ///
    /// Spans are assumed to be visually adjacent, so no separator is
    /// inserted between them.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .filter(|s| !s.is_blank())
            .map(|s| s.text.as_str())
            .collect()
    }

    pub fn bbox(&self) -> Option<BBox> {
        self.spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|acc, b| acc.union(&b))
    }
}

/// A layout block: a stack of lines sharing one bounding box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub bbox: BBox,
    pub lines: Vec<Line>,
}

impl Block {
    pub fn new(bbox: BBox, lines: Vec<Line>) -> Self {
        Self { bbox, lines }
    }

    /// Build a block whose bounding box covers all of its spans.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let bbox = lines
            .iter()
            .filter_map(Line::bbox)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        Self { bbox, lines }
    }

    /// The first span of the first line, if any.
    pub fn leading_span(&self) -> Option<&Span> {
        self.lines.first().and_then(|l| l.spans.first())
    }

    /// Representative style of the block, taken from its leading span.
    pub fn leading_style(&self) -> Option<VisualStyle> {
        self.leading_span().map(Span::style)
    }

    /// Full block text: line texts joined by single spaces, trimmed, with
    /// non-breaking spaces normalized.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .replace('\u{00A0}', " ")
    }

    /// Iterate over every span in the block.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> Span {
        Span::new(text, 12.0, "Helvetica", 0)
    }

    #[test]
    fn test_bold_decoded_from_flags() {
        assert!(Span::new("A", 12.0, "Arial", SPAN_FLAG_BOLD).bold);
        assert!(Span::new("A", 12.0, "Arial", SPAN_FLAG_BOLD | SPAN_FLAG_SERIF).bold);
        assert!(!Span::new("A", 12.0, "Arial-Bold", SPAN_FLAG_ITALIC).bold);
    }

    #[test]
    fn test_line_text_skips_blank_spans() {
        let line = Line::new(vec![span("Intro"), span("   "), span("duction ")]);
        assert_eq!(line.text(), "Introduction ");
    }

    #[test]
    fn test_block_text_joins_lines() {
        let block = Block::from_lines(vec![
            Line::new(vec![span(" Annual")]),
            Line::new(vec![span("Report\u{00A0}2024 ")]),
        ]);
        assert_eq!(block.text(), "Annual Report 2024");
    }

    #[test]
    fn test_block_bbox_covers_spans() {
        let a = span("a").with_bbox(BBox::new(10.0, 20.0, 50.0, 32.0));
        let b = span("b").with_bbox(BBox::new(12.0, 34.0, 80.0, 46.0));
        let block = Block::from_lines(vec![Line::new(vec![a]), Line::new(vec![b])]);
        assert_eq!(block.bbox, BBox::new(10.0, 20.0, 80.0, 46.0));
    }

    #[test]
    fn test_leading_style() {
        let block = Block::from_lines(vec![Line::new(vec![
            Span::new("1.", 14.2, "Arial-Bold", SPAN_FLAG_BOLD),
            span("Scope"),
        ])]);
        assert_eq!(
            block.leading_style(),
            Some(VisualStyle::new(14.0, true, "Arial-Bold"))
        );
        assert_eq!(Block::default().leading_style(), None);
    }
}
