//! # pdfoutline
//!
//! Infer a document outline (title plus H1-H5 headings with page numbers)
//! from the typography of a PDF.
//!
//! PDF files rarely carry a usable bookmark tree, so the outline is
//! reconstructed from what the text looks like: the dominant body style is
//! found first, larger or bolder styles are ranked into heading levels, and
//! every text block is filtered and classified against that ranking.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render, JsonFormat};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typography-driven**: works without bookmarks or tagged structure
//! - **Numbering-aware**: `1.`, `1.1`, `1.1.1`, `1.1.1.1` prefixes override size ranking
//! - **Bounded**: page ceiling and advisory time budget per document
//! - **Batch mode**: whole directories in parallel with Rayon

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{process_directory, BatchEntry, BatchOptions, BatchOutcome, BatchReport};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    BBox, Block, Document, HeadingLevel, Line, OutlineEntry, Page, Span, StructuredOutline,
    VisualStyle,
};
pub use outline::{
    guard_document, infer_outline, outline_bytes, outline_file, GuardedOutline, OutlineOptions,
};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use render::JsonFormat;

use std::path::Path;
use std::time::Duration;

/// Parse a PDF file into positioned blocks.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::parse_file;
///
/// let doc = parse_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    PdfParser::open(path)?.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    PdfParser::from_bytes(data)?.parse()
}

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<StructuredOutline> {
    extract_outline_with_options(path, &OutlineOptions::default())
}

/// Extract the outline of a PDF file with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<StructuredOutline> {
    Ok(outline_file(path, options)?.outline)
}

/// Extract the outline of a PDF file as JSON.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_outline(path)?;
    render::to_json(&outline, format)
}

/// Builder for outlining PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::Outliner;
///
/// let json = Outliner::new()
///     .lenient()
///     .with_max_pages(100)
///     .outline("document.pdf")?
///     .to_json()?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
pub struct Outliner {
    options: OutlineOptions,
    format: JsonFormat,
}

impl Outliner {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: OutlineOptions::default(),
            format: JsonFormat::Pretty,
        }
    }

    /// Keep going when a page fails to decode.
    pub fn lenient(mut self) -> Self {
        self.options.parse = self.options.parse.lenient();
        self
    }

    /// Disable parallel page grouping.
    pub fn sequential(mut self) -> Self {
        self.options.parse = self.options.parse.sequential();
        self
    }

    /// Set document password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.options.parse = self.options.parse.with_password(password);
        self
    }

    /// Set the page ceiling.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.options = self.options.with_max_pages(pages);
        self
    }

    /// Set the advisory time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.options = self.options.with_time_budget(budget);
        self
    }

    /// Emit compact JSON.
    pub fn compact(mut self) -> Self {
        self.format = JsonFormat::Compact;
        self
    }

    /// Outline a PDF file.
    pub fn outline<P: AsRef<Path>>(self, path: P) -> Result<OutlineResult> {
        let guarded = outline_file(path, &self.options)?;
        Ok(OutlineResult {
            guarded,
            format: self.format,
        })
    }

    /// Outline a PDF held in memory.
    pub fn outline_bytes(self, data: &[u8]) -> Result<OutlineResult> {
        let guarded = outline_bytes(data, &self.options)?;
        Ok(OutlineResult {
            guarded,
            format: self.format,
        })
    }
}

impl Default for Outliner {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of outlining a PDF document.
pub struct OutlineResult {
    guarded: GuardedOutline,
    format: JsonFormat,
}

impl OutlineResult {
    /// The inferred outline.
    pub fn outline(&self) -> &StructuredOutline {
        &self.guarded.outline
    }

    /// Whether the run went over the time budget.
    pub fn budget_exceeded(&self) -> bool {
        self.guarded.budget_exceeded
    }

    /// Pages in the source document.
    pub fn page_count(&self) -> u32 {
        self.guarded.page_count
    }

    /// Render as JSON in the builder's format.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.guarded.outline, self.format)
    }

    pub fn into_outline(self) -> StructuredOutline {
        self.guarded.outline
    }
}
