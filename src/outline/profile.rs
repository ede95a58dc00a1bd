//! Document-wide style frequency statistics.

use std::collections::BTreeMap;

use crate::model::{Document, Page, VisualStyle};

/// Character counts per visual style.
///
/// Counting characters rather than spans weights long running paragraphs
/// heavily against short heading fragments, which is what singles out body
/// text. Profiles are additive, so per-page profiles can be merged in any
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleProfile {
    counts: BTreeMap<VisualStyle, usize>,
}

impl StyleProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `chars` characters of text in `style`.
    pub fn record(&mut self, style: VisualStyle, chars: usize) {
        *self.counts.entry(style).or_insert(0) += chars;
    }

    /// Fold another profile into this one.
    pub fn merge(mut self, other: StyleProfile) -> Self {
        for (style, count) in other.counts {
            self.record(style, count);
        }
        self
    }

    /// Character count for a style (0 if unseen).
    pub fn count(&self, style: &VisualStyle) -> usize {
        self.counts.get(style).copied().unwrap_or(0)
    }

    /// Styles with their counts, in style order.
    pub fn iter(&self) -> impl Iterator<Item = (&VisualStyle, usize)> {
        self.counts.iter().map(|(s, c)| (s, *c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Profile every span of a document.
pub fn profile(document: &Document) -> StyleProfile {
    document
        .pages
        .iter()
        .map(profile_page)
        .fold(StyleProfile::new(), StyleProfile::merge)
}

/// Profile the spans of a single page.
pub fn profile_page(page: &Page) -> StyleProfile {
    let mut profile = StyleProfile::new();
    for span in page.spans() {
        let text = span.trimmed();
        if !text.is_empty() {
            profile.record(span.style(), text.chars().count());
        }
    }
    profile
}
