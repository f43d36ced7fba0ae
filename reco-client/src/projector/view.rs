//! Memoised projection of raw citations into the visible slice.

use crate::types::{CitationResult, SortMode};

use super::cutoff::apply_cutoff;
use super::sort::sorted_order;

/// Inputs that determine the sorted order. The reveal count only slices the
/// order, so it is not part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionKey {
    /// Bumped every time the raw citation list is replaced.
    pub revision: u64,
    pub sort_mode: SortMode,
    /// `Some(max_keep)` when the relevance cutoff is active.
    pub cutoff: Option<usize>,
}

/// Cache of the last computed display order.
///
/// The cache is never authoritative: it is rebuilt from the raw list
/// whenever the key changes.
#[derive(Debug, Default)]
pub struct Projector {
    key: Option<ProjectionKey>,
    order: Vec<usize>,
    recomputations: u64,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display order for `citations` under `key`, recomputing only when the
    /// key differs from the previous call.
    pub fn order(&mut self, key: ProjectionKey, citations: &[CitationResult]) -> &[usize] {
        if self.key != Some(key) {
            self.order = compute_order(citations, key.sort_mode, key.cutoff);
            self.key = Some(key);
            self.recomputations += 1;
            tracing::trace!(
                revision = key.revision,
                sort = %key.sort_mode,
                len = self.order.len(),
                "recomputed citation order"
            );
        }
        &self.order
    }

    /// How many times the order has been rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

fn compute_order(
    citations: &[CitationResult],
    sort_mode: SortMode,
    cutoff: Option<usize>,
) -> Vec<usize> {
    let order = sorted_order(citations, sort_mode);
    match cutoff {
        Some(max_keep) => apply_cutoff(&order, citations, max_keep),
        None => order,
    }
}
