//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream, tracks the text state, and emits
//! positioned [`Span`]s. Spans are then grouped into lines by baseline
//! proximity and lines into blocks by spacing and style changes.
//!
//! All coordinates produced here are top-down: `y0` is the top edge and
//! grows towards the bottom of the page.

use std::collections::HashMap;

use super::backend::{decode_text_simple, ContentOp, PageId, PdfBackend, PdfValue, TextDecoder};
use crate::error::Result;
use crate::model::{
    BBox, Block, Line, Span, SPAN_FLAG_BOLD, SPAN_FLAG_ITALIC, SPAN_FLAG_MONOSPACE,
    SPAN_FLAG_SERIF,
};

// Font descriptor flag bits (PDF 32000-1, table 123).
const DESCRIPTOR_FIXED_PITCH: u32 = 1 << 0;
const DESCRIPTOR_SERIF: u32 = 1 << 1;
const DESCRIPTOR_ITALIC: u32 = 1 << 6;
const DESCRIPTOR_FORCE_BOLD: u32 = 1 << 18;

/// Glyph advance used when real widths are unknown, as a fraction of size.
const APPROX_CHAR_WIDTH: f32 = 0.5;
/// TJ adjustment (thousandths of an em) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Derive span style flags from font metadata.
pub fn span_flags(base_font: &str, descriptor_flags: u32, weight: Option<f32>) -> u32 {
    let name = base_font.to_lowercase();
    let mut flags = 0;

    let bold_name = ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|marker| name.contains(marker));
    if bold_name
        || descriptor_flags & DESCRIPTOR_FORCE_BOLD != 0
        || weight.is_some_and(|w| w >= 600.0)
    {
        flags |= SPAN_FLAG_BOLD;
    }

    if descriptor_flags & DESCRIPTOR_ITALIC != 0
        || name.contains("italic")
        || name.contains("oblique")
    {
        flags |= SPAN_FLAG_ITALIC;
    }

    if descriptor_flags & DESCRIPTOR_FIXED_PITCH != 0
        || name.contains("mono")
        || name.contains("courier")
    {
        flags |= SPAN_FLAG_MONOSPACE;
    }

    if descriptor_flags & DESCRIPTOR_SERIF != 0 || (name.contains("times") && !name.contains("sans"))
    {
        flags |= SPAN_FLAG_SERIF;
    }

    flags
}

/// Page geometry used to convert PDF user space to top-down coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PageFrame {
    left: f32,
    top: f32,
    pub width: f32,
    pub height: f32,
}

impl PageFrame {
    /// Build from a media box `[llx, lly, urx, ury]`.
    pub fn from_media_box(media_box: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = media_box;
        Self {
            left: x0.min(x1),
            top: y0.max(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }
}

/// Affine matrix `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_op(op: &ContentOp) -> Option<Self> {
        Some(Self {
            a: op.number(0)?,
            b: op.number(1)?,
            c: op.number(2)?,
            d: op.number(3)?,
            e: op.number(4)?,
            f: op.number(5)?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text and graphics state relevant to span placement.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font: Option<Vec<u8>>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font: None,
            font_size: 12.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            rise: 0.0,
        }
    }
}

impl TextState {
    fn begin_text(&mut self) {
        self.text_matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn set_text_matrix(&mut self, m: Matrix) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
    }

    fn rendering_matrix(&self) -> Matrix {
        Matrix::translation(0.0, self.rise)
            .then(&self.text_matrix)
            .then(&self.ctm)
    }

    /// Estimated advance of `text` in unscaled text space.
    fn text_advance(&self, text: &str) -> f32 {
        let glyphs = text.chars().count() as f32;
        let spaces = text.chars().filter(|c| *c == ' ').count() as f32;
        (glyphs * (self.font_size.abs() * APPROX_CHAR_WIDTH + self.char_spacing)
            + spaces * self.word_spacing)
            * self.horizontal_scaling
    }
}

#[derive(Debug, Clone)]
struct FontStyle {
    base_font: String,
    flags: u32,
}

/// Content-stream analyzer for one backend.
pub struct LayoutAnalyzer<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LayoutAnalyzer<'a, B> {
    /// Create a new analyzer.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract positioned spans from a page, in content-stream order.
    pub fn extract_page_spans(&self, page_id: PageId, frame: PageFrame) -> Result<Vec<Span>> {
        let fonts: HashMap<Vec<u8>, FontStyle> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|info| {
                let flags = span_flags(&info.base_font, info.descriptor_flags, info.weight);
                (
                    info.name,
                    FontStyle {
                        base_font: info.base_font,
                        flags,
                    },
                )
            })
            .collect();

        let content = self.backend.page_content(page_id)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;

        let mut run = PageRun {
            backend: self.backend,
            page_id,
            frame,
            fonts,
            decoders: HashMap::new(),
            state: TextState::default(),
            spans: Vec::new(),
        };
        for op in &ops {
            run.apply(op);
        }

        log::trace!("page {:?}: {} spans", page_id, run.spans.len());
        Ok(run.spans)
    }
}

/// Mutable walk over one page's operations.
struct PageRun<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page_id: PageId,
    frame: PageFrame,
    fonts: HashMap<Vec<u8>, FontStyle>,
    decoders: HashMap<Vec<u8>, TextDecoder<'a>>,
    state: TextState,
    spans: Vec<Span>,
}

impl<'a, B: PdfBackend + ?Sized> PageRun<'a, B> {
    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => {
                let ctm = self.state.ctm;
                self.state.ctm_stack.push(ctm);
            }
            "Q" => {
                if let Some(ctm) = self.state.ctm_stack.pop() {
                    self.state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_op(op) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "BT" => self.state.begin_text(),
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font = Some(name.clone());
                }
                if let Some(size) = op.number(1) {
                    self.state.font_size = size;
                }
            }
            "TL" => self.state.leading = op.number(0).unwrap_or(0.0),
            "Tc" => self.state.char_spacing = op.number(0).unwrap_or(0.0),
            "Tw" => self.state.word_spacing = op.number(0).unwrap_or(0.0),
            "Tz" => self.state.horizontal_scaling = op.number(0).unwrap_or(100.0) / 100.0,
            "Ts" => self.state.rise = op.number(0).unwrap_or(0.0),
            "Td" => {
                let (tx, ty) = (op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                self.state.move_line(tx, ty);
            }
            "TD" => {
                let (tx, ty) = (op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                self.state.leading = -ty;
                self.state.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_op(op) {
                    self.state.set_text_matrix(m);
                }
            }
            "T*" => self.state.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "'" => {
                self.state.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "\"" => {
                self.state.word_spacing = op.number(0).unwrap_or(self.state.word_spacing);
                self.state.char_spacing = op.number(1).unwrap_or(self.state.char_spacing);
                self.state.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show_array(items);
                }
            }
            _ => {}
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> String {
        let Some(font) = self.state.font.clone() else {
            return decode_text_simple(bytes);
        };
        let backend = self.backend;
        let page_id = self.page_id;
        let decoder = self
            .decoders
            .entry(font)
            .or_insert_with_key(|name| backend.text_decoder(page_id, name));
        (**decoder)(bytes)
    }

    fn show_array(&mut self, items: &[PdfValue]) {
        let mut text = String::new();
        let mut extra_advance = 0.0;
        let scale = self.state.font_size.abs() * self.state.horizontal_scaling / 1000.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => text.push_str(&self.decode(bytes)),
                other => {
                    let Some(adjustment) = other.as_number() else {
                        continue;
                    };
                    extra_advance -= adjustment * scale;
                    if -adjustment > TJ_SPACE_THRESHOLD
                        && text
                            .chars()
                            .last()
                            .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
                    {
                        text.push(' ');
                    }
                }
            }
        }

        self.show(text, extra_advance);
    }

    /// Record a span at the current position and advance past it.
    fn show(&mut self, text: String, extra_advance: f32) {
        let advance = self.state.text_advance(&text) + extra_advance;

        if !text.trim().is_empty() {
            let trm = self.state.rendering_matrix();
            let size = self.state.font_size.abs() * trm.vertical_scale();
            let width = advance.max(0.0) * trm.horizontal_scale();

            let x0 = trm.e - self.frame.left;
            let baseline = trm.f;
            let bbox = BBox::new(
                x0,
                self.frame.top - (baseline + size * 0.8),
                x0 + width,
                self.frame.top - (baseline - size * 0.2),
            );

            let (font_name, flags) = match self.state.font.as_ref().and_then(|f| self.fonts.get(f))
            {
                Some(style) => (style.base_font.clone(), style.flags),
                None => {
                    let name = self
                        .state
                        .font
                        .as_deref()
                        .map(|n| String::from_utf8_lossy(n).to_string())
                        .unwrap_or_default();
                    let flags = span_flags(&name, 0, None);
                    (name, flags)
                }
            };

            self.spans
                .push(Span::new(text, size, font_name, flags).with_bbox(bbox));
        }

        self.state.advance(advance);
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Group positioned spans into blocks in reading order.
pub fn build_blocks(spans: Vec<Span>) -> Vec<Block> {
    group_lines_into_blocks(group_spans_into_lines(spans))
}

/// Group spans sharing a baseline into lines, top to bottom.
///
/// Within a line, adjacent spans of the same style are merged, and a space
/// is inserted wherever the horizontal gap between spans looks like a word
/// break.
pub fn group_spans_into_lines(mut spans: Vec<Span>) -> Vec<Line> {
    spans.retain(|s| !s.is_blank());
    if spans.is_empty() {
        return vec![];
    }

    spans.sort_by(|a, b| {
        a.bbox
            .y1
            .total_cmp(&b.bbox.y1)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Vec<Span>> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut baseline: Option<f32> = None;

    for span in spans {
        let tolerance = span.size * 0.3;
        let span_baseline = baseline_of(&span);
        match baseline {
            Some(y) if (span_baseline - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                baseline = Some(span_baseline);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.into_iter().map(join_line_spans).collect()
}

fn baseline_of(span: &Span) -> f32 {
    span.bbox.y1 - span.size * 0.2
}

fn join_line_spans(mut spans: Vec<Span>) -> Line {
    spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        let Some(prev) = merged.last_mut() else {
            merged.push(span);
            continue;
        };

        let space = needs_space(prev, &span);
        if prev.font_name == span.font_name
            && prev.flags == span.flags
            && (prev.size - span.size).abs() < 0.01
        {
            if space {
                prev.text.push(' ');
            }
            prev.text.push_str(&span.text);
            prev.bbox = prev.bbox.union(&span.bbox);
        } else {
            if space {
                prev.text.push(' ');
            }
            merged.push(span);
        }
    }

    Line::new(merged)
}

/// Whether a word space separates `prev` from `next`.
fn needs_space(prev: &Span, next: &Span) -> bool {
    let gap = next.bbox.x0 - prev.bbox.x1;
    let chars = next.text.chars().count();
    let char_width = if chars > 0 && next.bbox.width() > 0.0 {
        next.bbox.width() / chars as f32
    } else {
        next.size * APPROX_CHAR_WIDTH
    };
    if gap <= char_width * 0.2 {
        return false;
    }

    let prev_last = prev.text.chars().last();
    let next_first = next.text.chars().next();
    if prev_last.is_some_and(char::is_whitespace) || next_first.is_some_and(char::is_whitespace) {
        return false;
    }

    !(prev_last.is_some_and(is_spaceless_script_char)
        && next_first.is_some_and(is_spaceless_script_char))
}

/// Summary of a line used for block breaking.
struct LineMetrics {
    top: f32,
    baseline: f32,
    left: f32,
    size: f32,
    bold: bool,
}

impl LineMetrics {
    fn of(line: &Line) -> Self {
        let bbox = line.bbox().unwrap_or_default();
        let total_chars: usize = line.spans.iter().map(|s| s.text.chars().count()).sum();
        let size = if total_chars > 0 {
            line.spans
                .iter()
                .map(|s| s.size * s.text.chars().count() as f32)
                .sum::<f32>()
                / total_chars as f32
        } else {
            line.spans.first().map(|s| s.size).unwrap_or(0.0)
        };
        let baseline = line.spans.first().map(baseline_of).unwrap_or(bbox.y1);

        Self {
            top: bbox.y0,
            baseline,
            left: bbox.x0,
            size,
            bold: line.spans.first().is_some_and(|s| s.bold),
        }
    }
}

/// Group consecutive lines into blocks.
pub fn group_lines_into_blocks(lines: Vec<Line>) -> Vec<Block> {
    if lines.is_empty() {
        return vec![];
    }

    let metrics: Vec<LineMetrics> = lines.iter().map(LineMetrics::of).collect();
    let avg_spacing = average_line_spacing(&metrics);

    let mut blocks = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 && should_break_block(&metrics[i - 1], &metrics[i], avg_spacing) {
            blocks.push(Block::from_lines(std::mem::take(&mut current)));
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(Block::from_lines(current));
    }

    blocks
}

fn average_line_spacing(metrics: &[LineMetrics]) -> f32 {
    let spacings: Vec<f32> = metrics
        .windows(2)
        .map(|w| (w[1].baseline - w[0].baseline).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &LineMetrics, curr: &LineMetrics, avg_spacing: f32) -> bool {
    // Paragraph gap
    if (curr.baseline - prev.baseline).abs() > avg_spacing * 1.5 {
        return true;
    }

    // Overlapping or out-of-order lines
    if curr.top < prev.top {
        return true;
    }

    if (prev.size - curr.size).abs() > 1.0 {
        return true;
    }

    if prev.bold != curr.bold {
        return true;
    }

    // Indentation
    (prev.left - curr.left).abs() > 20.0
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions A-F
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::backend::BackendFontInfo;

    struct MockBackend {
        ops: Vec<ContentOp>,
        fonts: Vec<BackendFontInfo>,
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn media_box(&self, _page: PageId) -> [f32; 4] {
            [0.0, 0.0, 612.0, 792.0]
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(self.fonts.clone())
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(b"BT ET".to_vec())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn text_decoder(&self, _page: PageId, _font_name: &[u8]) -> TextDecoder<'_> {
            Box::new(decode_text_simple)
        }
    }

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn num(n: f32) -> PdfValue {
        PdfValue::Real(n)
    }

    fn name(n: &str) -> PdfValue {
        PdfValue::Name(n.as_bytes().to_vec())
    }

    fn string(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    fn font(name: &str, base: &str, flags: u32) -> BackendFontInfo {
        BackendFontInfo {
            name: name.as_bytes().to_vec(),
            base_font: base.to_string(),
            descriptor_flags: flags,
            weight: None,
        }
    }

    fn spans_of(backend: &MockBackend) -> Vec<Span> {
        let frame = PageFrame::from_media_box(backend.media_box((1, 0)));
        LayoutAnalyzer::new(backend)
            .extract_page_spans((1, 0), frame)
            .unwrap()
    }

    fn span_at(text: &str, size: f32, x0: f32, top: f32) -> Span {
        let width = text.chars().count() as f32 * size * 0.5;
        Span::new(text, size, "Helvetica", 0).with_bbox(BBox::new(
            x0,
            top,
            x0 + width,
            top + size,
        ))
    }

    #[test]
    fn test_span_flags_from_name() {
        assert_eq!(span_flags("Helvetica-Bold", 0, None), SPAN_FLAG_BOLD);
        assert_eq!(span_flags("Arial-BoldItalicMT", 0, None) & SPAN_FLAG_ITALIC, SPAN_FLAG_ITALIC);
        assert_ne!(span_flags("MyriadPro-Semibold", 0, None) & SPAN_FLAG_BOLD, 0);
        assert_eq!(span_flags("Helvetica", 0, None), 0);
        assert_ne!(span_flags("Courier", 0, None) & SPAN_FLAG_MONOSPACE, 0);
        assert_ne!(span_flags("Times-Roman", 0, None) & SPAN_FLAG_SERIF, 0);
    }

    #[test]
    fn test_span_flags_from_descriptor() {
        assert_ne!(span_flags("F1", DESCRIPTOR_FORCE_BOLD, None) & SPAN_FLAG_BOLD, 0);
        assert_ne!(span_flags("F1", 0, Some(700.0)) & SPAN_FLAG_BOLD, 0);
        assert_eq!(span_flags("F1", 0, Some(400.0)) & SPAN_FLAG_BOLD, 0);
        assert_ne!(span_flags("F1", DESCRIPTOR_ITALIC, None) & SPAN_FLAG_ITALIC, 0);
    }

    #[test]
    fn test_matrix_composition() {
        let scale = Matrix {
            a: 2.0,
            d: 2.0,
            ..Matrix::IDENTITY
        };
        let moved = Matrix::translation(10.0, 20.0).then(&scale);
        assert_eq!(moved.e, 20.0);
        assert_eq!(moved.f, 40.0);
        assert_eq!(moved.vertical_scale(), 2.0);
    }

    #[test]
    fn test_extract_positions_top_down() {
        let backend = MockBackend {
            fonts: vec![font("F1", "Helvetica-Bold", 0)],
            ops: vec![
                op("BT", vec![]),
                op("Tf", vec![name("F1"), num(24.0)]),
                op("Td", vec![num(72.0), num(700.0)]),
                op("Tj", vec![string("Title")]),
                op("ET", vec![]),
            ],
        };

        let spans = spans_of(&backend);
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.text, "Title");
        assert_eq!(span.size, 24.0);
        assert_eq!(span.font_name, "Helvetica-Bold");
        assert!(span.bold);
        assert_eq!(span.bbox.x0, 72.0);
        // top = 792 - (700 + 0.8 * 24)
        assert!((span.bbox.y0 - 72.8).abs() < 1e-3);
        assert!((span.bbox.y1 - 96.8).abs() < 1e-3);
    }

    #[test]
    fn test_leading_and_next_line() {
        let backend = MockBackend {
            fonts: vec![font("F1", "Helvetica", 0)],
            ops: vec![
                op("BT", vec![]),
                op("Tf", vec![name("F1"), num(10.0)]),
                op("TL", vec![num(14.0)]),
                op("Td", vec![num(50.0), num(600.0)]),
                op("Tj", vec![string("one")]),
                op("T*", vec![]),
                op("Tj", vec![string("two")]),
                op("'", vec![string("three")]),
                op("ET", vec![]),
            ],
        };

        let spans = spans_of(&backend);
        let tops: Vec<f32> = spans.iter().map(|s| s.bbox.y0).collect();
        assert_eq!(spans.len(), 3);
        assert!((tops[1] - tops[0] - 14.0).abs() < 1e-3);
        assert!((tops[2] - tops[1] - 14.0).abs() < 1e-3);
        assert!(spans.iter().all(|s| s.bbox.x0 == 50.0));
    }

    #[test]
    fn test_text_matrix_scales_size() {
        let backend = MockBackend {
            fonts: vec![font("F1", "Helvetica", 0)],
            ops: vec![
                op("BT", vec![]),
                op("Tf", vec![name("F1"), num(1.0)]),
                op(
                    "Tm",
                    vec![num(18.0), num(0.0), num(0.0), num(18.0), num(100.0), num(500.0)],
                ),
                op("Tj", vec![string("Scaled")]),
                op("ET", vec![]),
            ],
        };

        let spans = spans_of(&backend);
        assert_eq!(spans[0].size, 18.0);
        assert_eq!(spans[0].bbox.x0, 100.0);
    }

    #[test]
    fn test_tj_array_word_break() {
        let backend = MockBackend {
            fonts: vec![font("F1", "Helvetica", 0)],
            ops: vec![
                op("BT", vec![]),
                op("Tf", vec![name("F1"), num(12.0)]),
                op(
                    "TJ",
                    vec![PdfValue::Array(vec![
                        string("Hello"),
                        PdfValue::Integer(-250),
                        string("World"),
                        PdfValue::Integer(-30),
                        string("!"),
                    ])],
                ),
                op("ET", vec![]),
            ],
        };

        let spans = spans_of(&backend);
        assert_eq!(spans[0].text, "Hello World!");
    }

    #[test]
    fn test_blank_text_emits_no_span() {
        let backend = MockBackend {
            fonts: vec![],
            ops: vec![
                op("BT", vec![]),
                op("Tj", vec![string("   ")]),
                op("ET", vec![]),
            ],
        };
        assert!(spans_of(&backend).is_empty());
    }

    /// Serves the same operations behind an empty content stream.
    struct EmptyStream(MockBackend);

    impl PdfBackend for EmptyStream {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            self.0.pages()
        }

        fn media_box(&self, page: PageId) -> [f32; 4] {
            self.0.media_box(page)
        }

        fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
            self.0.page_fonts(page)
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(b" \n".to_vec())
        }

        fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
            self.0.decode_content(data)
        }

        fn text_decoder(&self, page: PageId, font_name: &[u8]) -> TextDecoder<'_> {
            self.0.text_decoder(page, font_name)
        }
    }

    #[test]
    fn test_empty_stream_skips_decoding() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), num(12.0)]),
            op("Tj", vec![string("Ignored")]),
            op("ET", vec![]),
        ];
        let fonts = vec![font("F1", "Helvetica", 0)];

        let filled = MockBackend {
            fonts: fonts.clone(),
            ops: ops.clone(),
        };
        assert_eq!(spans_of(&filled).len(), 1);

        let empty = EmptyStream(MockBackend { fonts, ops });
        let frame = PageFrame::from_media_box(empty.media_box((1, 0)));
        let spans = LayoutAnalyzer::new(&empty)
            .extract_page_spans((1, 0), frame)
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_lines_merge_same_baseline() {
        let lines = group_spans_into_lines(vec![
            span_at("World", 12.0, 110.0, 100.0),
            span_at("Hello", 12.0, 72.0, 100.0),
            span_at("Next", 12.0, 72.0, 120.0),
        ]);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello World");
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[1].text(), "Next");
    }

    #[test]
    fn test_adjacent_spans_not_spaced() {
        // "Hel" ends at 72 + 3 * 6 = 90
        let lines = group_spans_into_lines(vec![
            span_at("Hel", 12.0, 72.0, 100.0),
            span_at("lo", 12.0, 90.0, 100.0),
        ]);
        assert_eq!(lines[0].text(), "Hello");
    }

    #[test]
    fn test_style_change_keeps_separate_spans() {
        let bold = Span::new("Note:", 12.0, "Helvetica-Bold", SPAN_FLAG_BOLD)
            .with_bbox(BBox::new(72.0, 100.0, 102.0, 112.0));
        let body = span_at("read this", 12.0, 110.0, 100.0);

        let lines = group_spans_into_lines(vec![body, bold]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 2);
        assert!(lines[0].spans[0].bold);
        assert_eq!(lines[0].text(), "Note: read this");
    }

    #[test]
    fn test_blocks_break_on_gap_and_size() {
        let blocks = build_blocks(vec![
            span_at("Heading", 20.0, 72.0, 80.0),
            span_at("first body line", 11.0, 72.0, 120.0),
            span_at("second body line", 11.0, 72.0, 134.0),
            span_at("third body line", 11.0, 72.0, 148.0),
            span_at("after a gap", 11.0, 72.0, 220.0),
        ]);

        let texts: Vec<String> = blocks.iter().map(Block::text).collect();
        assert_eq!(
            texts,
            vec![
                "Heading",
                "first body line second body line third body line",
                "after a gap",
            ]
        );
        assert!(blocks[0].bbox.y0 < blocks[1].bbox.y0);
    }

    #[test]
    fn test_blocks_break_on_weight_change() {
        let heading = Span::new("Scope", 11.0, "Helvetica-Bold", SPAN_FLAG_BOLD)
            .with_bbox(BBox::new(72.0, 100.0, 100.0, 111.0));
        let blocks = build_blocks(vec![heading, span_at("Body text", 11.0, 72.0, 114.0)]);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].leading_span().unwrap().bold);
    }

    #[test]
    fn test_page_frame_offset_media_box() {
        let frame = PageFrame::from_media_box([0.0, 0.0, 595.0, 842.0]);
        assert_eq!(frame.width, 595.0);
        assert_eq!(frame.height, 842.0);
    }

    #[test]
    fn test_cjk_no_space() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('あ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('A'));
    }
}
