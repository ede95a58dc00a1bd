//! Typographic classification key.

use serde::{Deserialize, Serialize};

/// Visual style of a span: rounded font size, weight and font name.
///
/// Two spans with the same key are treated as typographically identical.
/// Rounding collapses sub-point size jitter introduced by renderers. The
/// derived ordering (size, then bold, then font name) is used wherever a
/// deterministic tie-break between styles is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualStyle {
    /// Font size rounded to the nearest point
    pub size: i32,
    /// Whether the span is bold
    pub bold: bool,
    /// Font name as reported by the document
    pub font: String,
}

impl VisualStyle {
    /// Create a style key from a raw font size.
    pub fn new(size: f32, bold: bool, font: impl Into<String>) -> Self {
        Self {
            size: round_size(size),
            bold,
            font: font.into(),
        }
    }

    /// Whether the font name marks an italic face.
    pub fn is_italic(&self) -> bool {
        self.font.to_lowercase().contains("italic")
    }
}

/// Half-way sizes round to the even neighbour (12.5 -> 12, 13.5 -> 14).
fn round_size(size: f32) -> i32 {
    size.round_ties_even() as i32
}
