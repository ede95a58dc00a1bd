//! PDF document parser using lopdf.

use std::io::Read;
use std::path::Path;

use rayon::prelude::*;

use crate::detect::{detect_format_from_bytes, detect_format_from_path, PdfFormat};
use crate::error::Result;
use crate::model::{Document, Page, Span};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::layout::{build_blocks, LayoutAnalyzer, PageFrame};
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
pub struct PdfParser {
    backend: LopdfBackend,
    format: PdfFormat,
    options: ParseOptions,
}

/// Spans of one page, before grouping.
struct RawPage {
    number: u32,
    frame: PageFrame,
    spans: Vec<Span>,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_backend(backend, format, options))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, format, options))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn with_backend(backend: LopdfBackend, format: PdfFormat, options: ParseOptions) -> Self {
        // lopdf only tries the empty user password on load.
        if options.password.is_some() && backend.is_encrypted() {
            log::warn!("Password was provided but lopdf doesn't support decryption with it");
        }
        log::debug!("Loaded {} document", format);

        Self {
            backend,
            format,
            options,
        }
    }

    /// Parse every page into positioned blocks.
    pub fn parse(&self) -> Result<Document> {
        let pages = self.backend.pages();

        let mut raw_pages = Vec::with_capacity(pages.len());
        for (&number, &page_id) in &pages {
            raw_pages.push(self.extract_page(number, page_id)?);
        }

        let pages: Vec<Page> = if self.options.parallel {
            raw_pages.into_par_iter().map(assemble_page).collect()
        } else {
            raw_pages.into_iter().map(assemble_page).collect()
        };

        let mut document = Document::new();
        for page in pages {
            document.add_page(page);
        }
        Ok(document)
    }

    fn extract_page(&self, number: u32, page_id: PageId) -> Result<RawPage> {
        let frame = PageFrame::from_media_box(self.backend.media_box(page_id));
        let analyzer = LayoutAnalyzer::new(&self.backend);

        let spans = match analyzer.extract_page_spans(page_id, frame) {
            Ok(spans) => spans,
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Failed to extract text from page {}: {}", number, e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(RawPage {
            number,
            frame,
            spans,
        })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Detected PDF format.
    pub fn format(&self) -> &PdfFormat {
        &self.format
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.backend.version()
    }
}

fn assemble_page(raw: RawPage) -> Page {
    let mut page = Page::new(raw.number, raw.frame.width, raw.frame.height);
    page.blocks = build_blocks(raw.spans);
    page
}
