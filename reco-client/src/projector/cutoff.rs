//! Optional relevance cutoff for the citation tail.
//!
//! The service already trims obviously irrelevant hits, but a broad query
//! can still return a long flat tail. When enabled, the threshold is derived
//! from the score distribution of the top window:
//!
//! ```text
//! threshold = max(score at rank min(10, n),
//!                 median - 0.5 * MAD,
//!                 0.6 * third-best score)
//! ```
//!
//! where median and MAD (median absolute deviation) are computed over the
//! best `max_keep` scores.

use crate::types::CitationResult;

/// Rank whose score anchors the threshold from below.
const ANCHOR_RANK: usize = 10;
/// Fraction of the third-best score that the threshold never drops under.
const FLOOR_RATIO: f64 = 0.60;

/// Compute the relevance threshold, or `None` for an empty list.
pub fn relevance_threshold(citations: &[CitationResult], max_keep: usize) -> Option<f64> {
    let mut scores: Vec<f64> = citations
        .iter()
        .map(|c| if c.score.is_nan() { 0.0 } else { c.score })
        .collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    scores.truncate(max_keep.max(1));
    if scores.is_empty() {
        return None;
    }

    let med = median(&scores);
    let deviations: Vec<f64> = scores.iter().map(|s| (s - med).abs()).collect();
    let mad = median(&deviations);

    let score_at_anchor = scores[ANCHOR_RANK.min(scores.len()) - 1];
    let floor = scores[2.min(scores.len() - 1)] * FLOOR_RATIO;

    Some(score_at_anchor.max(med - 0.5 * mad).max(floor))
}

/// Keep the entries of `order` whose score reaches the threshold, preserving
/// their order and keeping at most `max_keep`.
pub fn apply_cutoff(order: &[usize], citations: &[CitationResult], max_keep: usize) -> Vec<usize> {
    let Some(threshold) = relevance_threshold(citations, max_keep) else {
        return Vec::new();
    };
    order
        .iter()
        .copied()
        .filter(|&i| citations[i].score >= threshold)
        .take(max_keep)
        .collect()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
