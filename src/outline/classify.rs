//! Body-text inference and size-ranked heading levels.

use std::collections::{BTreeMap, BTreeSet};

use super::profile::StyleProfile;
use crate::model::{HeadingLevel, VisualStyle};

/// Mapping from visual style to heading level.
///
/// Levels are assigned per rounded size, so every style sharing a size gets
/// the same level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingLevelMap {
    levels: BTreeMap<VisualStyle, HeadingLevel>,
}

impl HeadingLevelMap {
    pub fn get(&self, style: &VisualStyle) -> Option<HeadingLevel> {
        self.levels.get(style).copied()
    }

    pub fn contains(&self, style: &VisualStyle) -> bool {
        self.levels.contains_key(style)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VisualStyle, HeadingLevel)> {
        self.levels.iter().map(|(s, l)| (s, *l))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Result of classifying a style profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub heading_levels: HeadingLevelMap,
    /// `None` only when the document has no text at all.
    pub body_style: Option<VisualStyle>,
}

/// Pick the body style and rank heading-candidate styles into H1..H5.
///
/// Styles whose character count exceeds `min_frequency` compete for body
/// style; if none does, every style competes.
pub fn classify(profile: &StyleProfile, min_frequency: usize) -> Classification {
    let Some(body_style) = body_style(profile, min_frequency) else {
        return Classification::default();
    };

    let candidate_sizes: BTreeSet<i32> = profile
        .iter()
        .map(|(style, _)| style)
        .filter(|style| is_heading_candidate(style, &body_style))
        .map(|style| style.size)
        .collect();

    // Largest size first; sizes past the fifth get no level.
    let size_levels: BTreeMap<i32, HeadingLevel> = candidate_sizes
        .iter()
        .rev()
        .enumerate()
        .filter_map(|(rank, size)| HeadingLevel::from_rank(rank).map(|level| (*size, level)))
        .collect();

    let levels = profile
        .iter()
        .map(|(style, _)| style)
        .filter(|style| is_heading_candidate(style, &body_style))
        .filter_map(|style| {
            size_levels
                .get(&style.size)
                .map(|level| (style.clone(), *level))
        })
        .collect();

    log::debug!(
        "Body style {:?}, {} heading size(s)",
        body_style,
        size_levels.len()
    );

    Classification {
        heading_levels: HeadingLevelMap { levels },
        body_style: Some(body_style),
    }
}

/// Most frequent style, preferring styles above the frequency threshold.
///
/// Ties on count go to the smallest style in `VisualStyle` order (smaller
/// size, then non-bold, then font name).
fn body_style(profile: &StyleProfile, min_frequency: usize) -> Option<VisualStyle> {
    let frequent = argmax(profile.iter().filter(|(_, count)| *count > min_frequency));
    frequent.or_else(|| argmax(profile.iter())).cloned()
}

fn argmax<'a>(
    styles: impl Iterator<Item = (&'a VisualStyle, usize)>,
) -> Option<&'a VisualStyle> {
    // Iteration is in ascending style order; strict `>` keeps the first maximum.
    let mut best: Option<(&VisualStyle, usize)> = None;
    for (style, count) in styles {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((style, count)),
        }
    }
    best.map(|(style, _)| style)
}

fn is_heading_candidate(style: &VisualStyle, body: &VisualStyle) -> bool {
    style != body
        && (style.size > body.size || (style.bold && style.size >= body.size))
        && !style.is_italic()
}
