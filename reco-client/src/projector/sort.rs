//! Total orders over a citation list.
//!
//! Both modes use a stable sort, so items that compare equal keep the order
//! the service returned them in.

use std::cmp::Ordering;

use crate::types::{CitationResult, SortMode};

/// Indices into `citations` in display order for `mode`.
pub fn sorted_order(citations: &[CitationResult], mode: SortMode) -> Vec<usize> {
    let mut order: Vec<usize> = (0..citations.len()).collect();
    order.sort_by(|&a, &b| compare(&citations[a], &citations[b], mode));
    order
}

/// Comparator used by [`sorted_order`]. `Less` means `a` is shown first.
pub fn compare(a: &CitationResult, b: &CitationResult, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Relevance => by_score_desc(a, b),
        SortMode::YearDesc => b.year().cmp(&a.year()).then_with(|| by_score_desc(a, b)),
    }
}

fn by_score_desc(a: &CitationResult, b: &CitationResult) -> Ordering {
    score_key(b.score).total_cmp(&score_key(a.score))
}

// NaN sinks below every real score.
fn score_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}
