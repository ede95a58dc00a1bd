//! Final outline assembly: ordering, de-duplication and title fallback.

use std::collections::HashSet;

use super::extract::OutlineCandidate;
use crate::model::{HeadingLevel, OutlineEntry, StructuredOutline};

/// Order, de-duplicate and package candidates into the final outline.
///
/// Entries are ordered by level first, then page, then vertical position,
/// so every H1 in the document precedes every H2. The first entry for each
/// `(text, page)` pair is kept. A blank `detected_title` falls back to the
/// first H1 in the outline.
pub fn assemble(mut candidates: Vec<OutlineCandidate>, detected_title: &str) -> StructuredOutline {
    candidates.sort_by(|a, b| {
        a.level
            .cmp(&b.level)
            .then(a.page.cmp(&b.page))
            .then(a.y0.total_cmp(&b.y0))
    });

    let mut seen: HashSet<(String, u32)> = HashSet::new();
    let outline: Vec<OutlineEntry> = candidates
        .into_iter()
        .filter(|c| seen.insert((c.text.clone(), c.page)))
        .map(|c| OutlineEntry {
            level: c.level,
            text: c.text,
            page: c.page,
        })
        .collect();

    let title = if detected_title.trim().is_empty() {
        outline
            .iter()
            .find(|e| e.level == HeadingLevel::H1)
            .map(|e| e.text.as_str())
            .unwrap_or_default()
    } else {
        detected_title
    };

    StructuredOutline {
        title: collapse_whitespace(title),
        outline,
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(level: HeadingLevel, text: &str, page: u32, y0: f32) -> OutlineCandidate {
        OutlineCandidate {
            level,
            text: text.to_string(),
            page,
            y0,
        }
    }

    fn entry(level: HeadingLevel, text: &str, page: u32) -> OutlineEntry {
        OutlineEntry {
            level,
            text: text.to_string(),
            page,
        }
    }

    #[test]
    fn test_level_major_ordering() {
        let result = assemble(
            vec![
                cand(HeadingLevel::H2, "1.1 Goals", 1, 300.0),
                cand(HeadingLevel::H1, "2. Method", 3, 80.0),
                cand(HeadingLevel::H1, "1. Intro", 1, 200.0),
                cand(HeadingLevel::H1, "Preface", 1, 90.0),
            ],
            "Report",
        );

        assert_eq!(
            result.outline,
            vec![
                entry(HeadingLevel::H1, "Preface", 1),
                entry(HeadingLevel::H1, "1. Intro", 1),
                entry(HeadingLevel::H1, "2. Method", 3),
                entry(HeadingLevel::H2, "1.1 Goals", 1),
            ]
        );
        assert_eq!(result.title, "Report");
    }

    #[test]
    fn test_dedup_by_text_and_page() {
        let result = assemble(
            vec![
                cand(HeadingLevel::H2, "Summary", 2, 50.0),
                cand(HeadingLevel::H1, "Summary", 2, 400.0),
                cand(HeadingLevel::H1, "Conclusion", 5, 100.0),
                cand(HeadingLevel::H1, "Conclusion", 4, 100.0),
            ],
            "",
        );

        assert_eq!(
            result.outline,
            vec![
                entry(HeadingLevel::H1, "Summary", 2),
                entry(HeadingLevel::H1, "Conclusion", 4),
                entry(HeadingLevel::H1, "Conclusion", 5),
            ]
        );
    }

    #[test]
    fn test_title_fallback_to_first_h1() {
        let result = assemble(
            vec![
                cand(HeadingLevel::H2, "Scope", 1, 10.0),
                cand(HeadingLevel::H1, "Mission   Statement", 2, 10.0),
            ],
            "  ",
        );
        assert_eq!(result.title, "Mission Statement");
    }

    #[test]
    fn test_no_fallback_without_h1() {
        let result = assemble(vec![cand(HeadingLevel::H3, "Notes", 1, 10.0)], "");
        assert_eq!(result.title, "");
    }

    #[test]
    fn test_title_normalized() {
        let result = assemble(Vec::new(), "  Annual\n Report \t2024 ");
        assert_eq!(result.title, "Annual Report 2024");
        assert!(result.outline.is_empty());
    }
}
