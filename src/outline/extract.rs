//! Heading candidate extraction.

use super::classify::HeadingLevelMap;
use super::filters::{self, TextLimits};
use crate::model::{Block, Document, HeadingLevel};

/// Per-block "claimed" tags for a document.
///
/// Blocks claimed by the title detector are skipped by the heading pass, so
/// each block ends up as title, heading or nothing, never two of them.
#[derive(Debug, Clone, Default)]
pub struct BlockClaims {
    pages: Vec<Vec<bool>>,
}

impl BlockClaims {
    /// Unclaimed tags shaped like `document`.
    pub fn for_document(document: &Document) -> Self {
        Self {
            pages: document
                .pages
                .iter()
                .map(|p| vec![false; p.blocks.len()])
                .collect(),
        }
    }

    /// Claim a block by zero-based page and block index. Out-of-range
    /// indices are ignored.
    pub fn claim(&mut self, page_idx: usize, block_idx: usize) {
        if let Some(slot) = self
            .pages
            .get_mut(page_idx)
            .and_then(|p| p.get_mut(block_idx))
        {
            *slot = true;
        }
    }

    pub fn is_claimed(&self, page_idx: usize, block_idx: usize) -> bool {
        self.pages
            .get(page_idx)
            .and_then(|p| p.get(block_idx))
            .copied()
            .unwrap_or(false)
    }

    /// Number of claimed blocks.
    pub fn count(&self) -> usize {
        self.pages.iter().flatten().filter(|c| **c).count()
    }
}

/// A heading found in the document, still carrying its vertical position.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineCandidate {
    pub level: HeadingLevel,
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Top edge of the source block, used for ordering only
    pub y0: f32,
}

/// Walk every unclaimed block and collect heading candidates in document
/// order.
pub fn extract(
    document: &Document,
    levels: &HeadingLevelMap,
    claims: &BlockClaims,
    limits: TextLimits,
) -> Vec<OutlineCandidate> {
    let mut candidates = Vec::new();

    for (page_idx, page) in document.pages.iter().enumerate() {
        for (block_idx, block) in page.blocks.iter().enumerate() {
            if claims.is_claimed(page_idx, block_idx) {
                continue;
            }
            if let Some((level, text)) = classify_block(block, levels, limits) {
                candidates.push(OutlineCandidate {
                    level,
                    text,
                    page: page.number,
                    y0: block.bbox.y0,
                });
            }
        }
    }

    log::debug!("Collected {} heading candidate(s)", candidates.len());
    candidates
}

/// Resolve one block to a heading level and text, or `None` if it is not a
/// heading.
///
/// A leading section number wins over the style map.
pub fn classify_block(
    block: &Block,
    levels: &HeadingLevelMap,
    limits: TextLimits,
) -> Option<(HeadingLevel, String)> {
    let style = block.leading_style()?;
    let text = block.text();

    if let Some(reason) = filters::reject(&text, limits) {
        log::trace!("Rejected {:?}: {:?}", text, reason);
        return None;
    }

    let level = filters::numbering_level(&text).or_else(|| levels.get(&style))?;
    Some((level, text))
}
