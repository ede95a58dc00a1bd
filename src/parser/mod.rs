//! PDF parsing module.
//!
//! [`PdfParser`] loads a document through a [`PdfBackend`] and turns each
//! page into positioned blocks for outline inference.

pub mod backend;
mod layout;
mod options;
mod pdf_parser;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use layout::{
    build_blocks, group_lines_into_blocks, group_spans_into_lines, span_flags, LayoutAnalyzer,
    PageFrame,
};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
