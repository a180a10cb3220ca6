//! Strength/weakness highlights and sample review excerpts.

use std::cmp::Ordering;

use crate::models::{AspectScore, DisplayReview, ReviewRecord};
use crate::preprocess;

/// Aspects scoring at or above this (0-100) count as strengths.
pub const STRENGTH_THRESHOLD: f64 = 70.0;
/// Aspects scoring at or below this (0-100) count as weaknesses.
pub const WEAKNESS_THRESHOLD: f64 = 40.0;
/// Longest strengths or weaknesses list per product.
pub const MAX_HIGHLIGHTS: usize = 3;
/// Default number of excerpts per product.
pub const DEFAULT_SAMPLE_REVIEWS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

// Larger sample first, then aspect name, so equal scores order deterministically.
fn tie_break(a: &AspectScore, b: &AspectScore) -> Ordering {
    b.sample_count
        .cmp(&a.sample_count)
        .then_with(|| a.aspect.cmp(&b.aspect))
}

/// Splits one product's aspect scores into strengths and weaknesses.
///
/// Mid-range aspects land in neither list. A product without aspect scores
/// gets two empty lists.
pub fn highlights<'a>(scores: impl IntoIterator<Item = &'a AspectScore>) -> Highlights {
    let (mut strong, mut weak): (Vec<&AspectScore>, Vec<&AspectScore>) = (Vec::new(), Vec::new());
    for score in scores {
        if score.score >= STRENGTH_THRESHOLD {
            strong.push(score);
        } else if score.score <= WEAKNESS_THRESHOLD {
            weak.push(score);
        }
    }

    strong.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| tie_break(a, b))
    });
    weak.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| tie_break(a, b))
    });

    Highlights {
        strengths: strong.into_iter().take(MAX_HIGHLIGHTS).map(|s| s.aspect.clone()).collect(),
        weaknesses: weak.into_iter().take(MAX_HIGHLIGHTS).map(|s| s.aspect.clone()).collect(),
    }
}

/// First `limit` records in source order, with display-ready text.
pub fn sample_reviews(records: &[ReviewRecord], limit: usize) -> Vec<DisplayReview> {
    records
        .iter()
        .take(limit)
        .map(|r| DisplayReview {
            text: preprocess::display_text(&r.text),
            rating: r.rating,
            language: r.language,
            aspect: r.aspect.trim().to_string(),
        })
        .collect()
}
