//! Outline inference.
//!
//! The pipeline runs in fixed stages over an already-parsed [`Document`]:
//!
//! 1. [`profile`] counts characters per visual style.
//! 2. [`classify`] picks the body style and ranks heading sizes into H1..H5.
//! 3. [`detect_title`] reconstructs the title on the first page and claims
//!    its blocks.
//! 4. [`extract`] filters the remaining blocks and resolves their levels.
//! 5. [`assemble`] orders, de-duplicates and applies the title fallback.
//!
//! [`guard`] wraps the pipeline with the page ceiling and time budget.

mod assemble;
mod classify;
mod extract;
mod filters;
pub mod guard;
mod profile;
mod title;

use std::time::Duration;

pub use assemble::{assemble, collapse_whitespace};
pub use classify::{classify, Classification, HeadingLevelMap};
pub use extract::{classify_block, extract, BlockClaims, OutlineCandidate};
pub use filters::{
    is_full_date, is_numeric, is_prose, is_revision_or_version_header, numbering_level, reject,
    Rejection, TextLimits,
};
pub use guard::{guard_document, outline_bytes, outline_file, GuardedOutline};
pub use profile::{profile, profile_page, StyleProfile};
pub use title::{detect_title, TitleDetection};

use crate::model::{Document, StructuredOutline};
use crate::parser::ParseOptions;

/// Documents with more pages than this are rejected.
pub const MAX_PAGES: u32 = 50;
/// Advisory processing budget per document.
pub const TIME_BUDGET: Duration = Duration::from_secs(10);
/// Characters a style needs before it can be considered body text.
pub const MIN_STYLE_FREQUENCY: usize = 100;
/// Longest block text accepted as a heading.
pub const MAX_HEADING_LENGTH: usize = 250;
/// Fraction of the first page (from the top) searched for the title.
pub const TITLE_SEARCH_RATIO: f32 = 0.5;
/// Period-terminated blocks with more words than this are prose.
pub const PROSE_WORD_LIMIT: usize = 10;

/// Tuning knobs for outline inference.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Page ceiling; larger documents are rejected
    pub max_pages: u32,

    /// Advisory time budget; overruns are reported, not enforced
    pub time_budget: Duration,

    /// Minimum characters for a body-style candidate
    pub min_style_frequency: usize,

    /// Maximum heading length in characters
    pub max_heading_length: usize,

    /// Top fraction of the first page searched for the title
    pub title_search_ratio: f32,

    /// Word count above which period-terminated text is prose
    pub prose_word_limit: usize,

    /// Options passed to the PDF parser
    pub parse: ParseOptions,
}

impl OutlineOptions {
    /// Create options with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page ceiling.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the advisory time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Set the body-style frequency threshold.
    pub fn with_min_style_frequency(mut self, chars: usize) -> Self {
        self.min_style_frequency = chars;
        self
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_length(mut self, chars: usize) -> Self {
        self.max_heading_length = chars;
        self
    }

    /// Set the title search area as a fraction of page height.
    pub fn with_title_search_ratio(mut self, ratio: f32) -> Self {
        self.title_search_ratio = ratio;
        self
    }

    /// Set parser options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub(crate) fn text_limits(&self) -> TextLimits {
        TextLimits {
            max_length: self.max_heading_length,
            prose_words: self.prose_word_limit,
        }
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES,
            time_budget: TIME_BUDGET,
            min_style_frequency: MIN_STYLE_FREQUENCY,
            max_heading_length: MAX_HEADING_LENGTH,
            title_search_ratio: TITLE_SEARCH_RATIO,
            prose_word_limit: PROSE_WORD_LIMIT,
            parse: ParseOptions::default(),
        }
    }
}

/// Infer the outline of a parsed document.
///
/// Pure and deterministic: the same document always yields the same
/// outline. Page and time limits are not checked here; see
/// [`guard_document`].
pub fn infer_outline(document: &Document, options: &OutlineOptions) -> StructuredOutline {
    let styles = profile(document);
    let classification = classify(&styles, options.min_style_frequency);

    let mut claims = BlockClaims::for_document(document);
    let title = match document.first_page() {
        Some(page) => detect_title(page, options.title_search_ratio),
        None => TitleDetection::default(),
    };
    for block_idx in &title.blocks {
        claims.claim(0, *block_idx);
    }

    let candidates = extract(
        document,
        &classification.heading_levels,
        &claims,
        options.text_limits(),
    );
    assemble(candidates, &title.text)
}
