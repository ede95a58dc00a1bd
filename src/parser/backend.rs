//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the layout analysis logic.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter media box, used when a page declares none.
pub const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Decodes the raw bytes of a text-showing operand for one font.
pub type TextDecoder<'a> = Box<dyn Fn(&[u8]) -> String + 'a>;

/// Font information returned by the backend.
#[derive(Debug, Clone, Default)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
    /// `/Flags` from the font descriptor, 0 when absent.
    pub descriptor_flags: u32,
    /// `/FontWeight` from the font descriptor.
    pub weight: Option<f32>,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of an integer or real operand.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Numeric operand at `idx`.
    pub fn number(&self, idx: usize) -> Option<f32> {
        self.operands.get(idx).and_then(PdfValue::as_number)
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Media box `[llx, lly, urx, ury]` of a page.
    fn media_box(&self, page: PageId) -> [f32; 4];

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Build a decoder for text shown in `font_name` on `page`.
    ///
    /// Falls back to [`decode_text_simple`] when the font or its encoding is
    /// unavailable.
    fn text_decoder(&self, page: PageId, font_name: &[u8]) -> TextDecoder<'_>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self { doc }.validated()
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self { doc }.validated()
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Reject documents without a catalog and page tree.
    fn validated(self) -> Result<Self> {
        let catalog = self
            .doc
            .trailer
            .get(b"Root")
            .ok()
            .and_then(|root| self.resolve_dict(root))
            .ok_or_else(|| Error::Corrupted("missing document catalog".to_string()))?;
        if catalog
            .get(b"Pages")
            .ok()
            .and_then(|pages| self.resolve_dict(pages))
            .is_none()
        {
            return Err(Error::Corrupted("missing page tree".to_string()));
        }
        Ok(self)
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    fn resolve_number(&self, obj: &Object) -> Option<f32> {
        match obj {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r),
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .ok()
                .and_then(|o| self.resolve_number(o)),
            _ => None,
        }
    }

    /// Walk up the page tree until a `/MediaBox` is found.
    fn find_media_box(&self, dict: &Dictionary, depth: usize) -> Option<[f32; 4]> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let array = match obj {
                Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
                other => other.as_array().ok()?,
            };
            let nums: Vec<f32> = array.iter().filter_map(|o| self.resolve_number(o)).collect();
            if nums.len() >= 4 {
                return Some([nums[0], nums[1], nums[2], nums[3]]);
            }
        }

        // Guard against cyclic Parent chains in broken files.
        if depth > 32 {
            return None;
        }
        let parent = dict.get(b"Parent").ok().and_then(|p| self.resolve_dict(p))?;
        self.find_media_box(parent, depth + 1)
    }

    /// Font descriptor of a simple font, or of the first descendant of a
    /// composite font.
    fn font_descriptor<'a>(&'a self, font: &'a Dictionary) -> Option<&'a Dictionary> {
        if let Some(descriptor) = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| self.resolve_dict(d))
        {
            return Some(descriptor);
        }

        let descendants = match font.get(b"DescendantFonts").ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
            other => other.as_array().ok()?,
        };
        let descendant = self.resolve_dict(descendants.first()?)?;
        descendant
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| self.resolve_dict(d))
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn media_box(&self, page: PageId) -> [f32; 4] {
        self.doc
            .get_dictionary(page)
            .ok()
            .and_then(|dict| self.find_media_box(dict, 0))
            .unwrap_or(DEFAULT_MEDIA_BOX)
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut result = Vec::with_capacity(lopdf_fonts.len());
        for (name, font_dict) in &lopdf_fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            let descriptor = self.font_descriptor(font_dict);
            let descriptor_flags = descriptor
                .and_then(|d| d.get(b"Flags").ok())
                .and_then(|f| f.as_i64().ok())
                .map(|f| f as u32)
                .unwrap_or(0);
            let weight = descriptor
                .and_then(|d| d.get(b"FontWeight").ok())
                .and_then(|w| self.resolve_number(w));

            result.push(BackendFontInfo {
                name: name.clone(),
                base_font,
                descriptor_flags,
                weight,
            });
        }
        Ok(result)
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        self.doc
            .get_page_content(page)
            .map_err(|e| Error::PdfParse(e.to_string()))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn text_decoder(&self, page: PageId, font_name: &[u8]) -> TextDecoder<'_> {
        let font = self
            .doc
            .get_page_fonts(page)
            .ok()
            .and_then(|fonts| fonts.get(font_name).copied());
        let encoding = font.and_then(|f| f.get_font_encoding(&self.doc).ok());

        match encoding {
            Some(enc) => Box::new(move |bytes: &[u8]| {
                LopdfDocument::decode_text(&enc, bytes).unwrap_or_else(|_| decode_text_simple(bytes))
            }),
            None => Box::new(decode_text_simple),
        }
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}
