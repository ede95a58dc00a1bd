//! Document model types.
//!
//! The parsed side (`Document` → `Page` → `Block` → `Line` → `Span`) is what
//! the parser produces and the outline pipeline consumes; the output side
//! (`StructuredOutline`, `OutlineEntry`) is what gets serialized.

mod block;
mod document;
mod outline;
mod style;

pub use block::{
    BBox, Block, Line, Span, SPAN_FLAG_BOLD, SPAN_FLAG_ITALIC, SPAN_FLAG_MONOSPACE,
    SPAN_FLAG_SERIF, SPAN_FLAG_SUPERSCRIPT,
};
pub use document::{Document, Page};
pub use outline::{HeadingLevel, OutlineEntry, StructuredOutline};
pub use style::VisualStyle;
