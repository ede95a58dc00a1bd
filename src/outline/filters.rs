//! Text-shape heuristics applied to heading candidates.
//!
//! Each rejection rule is an independent predicate over the block text.
//! Rules run in a fixed order before level resolution; the first rule that
//! fires names the reason a block was dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::HeadingLevel;

static FULL_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}$",
    )
    .unwrap()
});

/// Unicode decimal digits only.
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

static REVISION_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\s+\d{1,2}\s+[A-Z]{3,9}\s+\d{4}\s+").unwrap());

static VERSION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^version\s+\d+(\.\d+)?$").unwrap());

/// Numbering prefixes, deepest last: `N. `, `N.N `, `N.N.N `, `N.N.N.N `.
static NUMBERING: Lazy<[(Regex, HeadingLevel); 4]> = Lazy::new(|| {
    [
        (Regex::new(r"^\d+\.\s").unwrap(), HeadingLevel::H1),
        (Regex::new(r"^\d+\.\d+\s").unwrap(), HeadingLevel::H2),
        (Regex::new(r"^\d+\.\d+\.\d+\s").unwrap(), HeadingLevel::H3),
        (Regex::new(r"^\d+\.\d+\.\d+\.\d+\s").unwrap(), HeadingLevel::H4),
    ]
});

/// Why a block's text was ruled out as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    TooLong,
    Numeric,
    Prose,
    Date,
    RevisionHeader,
}

/// Limits for the length-based rules.
#[derive(Debug, Clone, Copy)]
pub struct TextLimits {
    /// Longest accepted heading, in characters
    pub max_length: usize,
    /// Sentences ending in a period with more words than this are prose
    pub prose_words: usize,
}

/// Run every rejection rule in order; `None` means the text may be a heading.
pub fn reject(text: &str, limits: TextLimits) -> Option<Rejection> {
    if text.is_empty() {
        return Some(Rejection::Empty);
    }
    if text.chars().count() > limits.max_length {
        return Some(Rejection::TooLong);
    }
    if is_numeric(text) {
        return Some(Rejection::Numeric);
    }
    if is_prose(text, limits.prose_words) {
        return Some(Rejection::Prose);
    }
    if is_full_date(text) {
        return Some(Rejection::Date);
    }
    if is_revision_or_version_header(text) {
        return Some(Rejection::RevisionHeader);
    }
    None
}

/// Text made of decimal digits only, ignoring surrounding whitespace.
///
/// Roman numerals and vulgar fractions are not digits.
pub fn is_numeric(text: &str) -> bool {
    DIGITS.is_match(text.trim())
}

/// A period-terminated run of more than `max_words` words.
pub fn is_prose(text: &str, max_words: usize) -> bool {
    text.ends_with('.') && text.split_whitespace().count() > max_words
}

/// `<Month> D[D], YYYY`.
pub fn is_full_date(text: &str) -> bool {
    FULL_DATE.is_match(text)
}

/// A revision-history row (`1.0 12 MARCH 2024 ...`) or a bare
/// `Version N[.N]` label.
pub fn is_revision_or_version_header(text: &str) -> bool {
    REVISION_ROW.is_match(text) || VERSION_LABEL.is_match(text.trim())
}

/// Heading level implied by a leading section number, if any.
pub fn numbering_level(text: &str) -> Option<HeadingLevel> {
    NUMBERING
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, level)| *level)
}
