//! Title detection on the first page.

use crate::model::{Page, VisualStyle};

/// Title found on the first page and the blocks it was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleDetection {
    /// Title text; empty when nothing qualified
    pub text: String,
    /// Indices into the first page's blocks, in the order they were found
    pub blocks: Vec<usize>,
}

/// Reconstruct the title from the largest-font blocks in the top part of
/// `page`.
///
/// The style of the single largest span on the page becomes the title
/// style; every block whose top edge lies within `search_ratio` of the page
/// height and whose leading span has that style is part of the title.
/// Selected blocks are read top to bottom and joined with single spaces.
pub fn detect_title(page: &Page, search_ratio: f32) -> TitleDetection {
    let Some(title_style) = largest_style(page) else {
        return TitleDetection::default();
    };

    let limit = page.height * search_ratio;
    let blocks: Vec<usize> = page
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.bbox.y0 <= limit)
        .filter(|(_, block)| block.leading_style().as_ref() == Some(&title_style))
        .map(|(idx, _)| idx)
        .collect();

    let mut ordered = blocks.clone();
    ordered.sort_by(|a, b| page.blocks[*a].bbox.y0.total_cmp(&page.blocks[*b].bbox.y0));

    let text = ordered
        .iter()
        .map(|idx| page.blocks[*idx].text())
        .collect::<Vec<_>>()
        .join(" ");

    log::debug!("Title style {:?} matched {} block(s)", title_style, blocks.len());

    TitleDetection { text, blocks }
}

/// Style of the first span carrying the page's largest font size.
fn largest_style(page: &Page) -> Option<VisualStyle> {
    let mut best: Option<(f32, VisualStyle)> = None;
    for span in page.spans() {
        if span.size > best.as_ref().map_or(0.0, |(size, _)| *size) {
            best = Some((span.size, span.style()));
        }
    }
    best.map(|(_, style)| style)
}
