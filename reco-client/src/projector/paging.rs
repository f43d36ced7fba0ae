//! Incremental disclosure of the sorted citation list.

/// Reveal counter for the citation list.
///
/// Starts at one page, grows by one page per [`Pagination::load_more`], and
/// resets on every new query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    reveal_count: usize,
}

impl Pagination {
    /// A counter revealing `page_size` items initially. A zero page size is
    /// treated as one.
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            reveal_count: page_size,
        }
    }

    /// Back to the initial page.
    pub fn reset(&mut self) {
        self.reveal_count = self.page_size;
    }

    /// Whether another page exists for a sorted list of `total` items.
    pub fn can_load_more(&self, total: usize) -> bool {
        self.reveal_count < total
    }

    /// Reveal one more page. No-op once everything is visible; returns
    /// whether the counter moved.
    pub fn load_more(&mut self, total: usize) -> bool {
        if !self.can_load_more(total) {
            return false;
        }
        self.reveal_count += self.page_size;
        true
    }

    /// Number of items visible out of `total`.
    pub fn visible(&self, total: usize) -> usize {
        self.reveal_count.min(total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_page() {
        let p = Pagination::default();
        assert_eq!(p.visible(3), 3);
        assert_eq!(p.visible(50), 10);
    }

    #[test]
    fn load_more_grows_by_page_until_exhausted() {
        let mut p = Pagination::new(10);
        let total = 27;
        for n in 1..=5 {
            p.load_more(total);
            assert_eq!(p.visible(total), (10 + 10 * n).min(total));
        }
        assert!(!p.can_load_more(total));
        assert!(!p.load_more(total));
        assert_eq!(p.visible(100), 30);
    }

    #[test]
    fn load_more_noop_when_everything_visible() {
        let mut p = Pagination::new(10);
        assert!(!p.load_more(10));
        assert!(!p.load_more(4));
        assert_eq!(p.visible(100), 10);
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut p = Pagination::new(10);
        p.load_more(100);
        p.load_more(100);
        p.reset();
        assert_eq!(p.visible(100), 10);
    }

    #[test]
    fn zero_page_size_clamped() {
        let mut p = Pagination::new(0);
        assert_eq!(p.visible(5), 1);
        assert!(p.load_more(5));
        assert_eq!(p.visible(5), 2);
    }
}
