//! Page cursor over arbitrary slices.
//!
//! # Invariants
//! - `page_size` is always within `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
//! - `current_page` is 1-based and never below 1.
//! - The pager stores no items; every call takes the full collection.

pub const DEFAULT_PAGE_SIZE: usize = 3;
pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 15;

/// Current page number and page size for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }

    /// Pager with `page_size` clamped into range.
    pub fn with_page_size(page_size: usize) -> Self {
        let mut pager = Self::new();
        pager.set_page_size(page_size);
        pager
    }

    /// Items of the current page; empty when the page is past the end.
    pub fn current_page_items<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        let first = self.first_index().min(all.len());
        let last = (first + self.page_size).min(all.len());
        &all[first..last]
    }

    /// Steps back one page; returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Steps forward when the next page would start inside `all`.
    pub fn next_page<T>(&mut self, all: &[T]) -> bool {
        let next_first = self.current_page * self.page_size;
        if next_first < all.len() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Whether the current page starts inside `all`.
    ///
    /// Turns `false` when deletions empty a trailing page, and always for an
    /// empty collection.
    pub fn is_current_page_valid<T>(&self, all: &[T]) -> bool {
        self.first_index() < all.len()
    }

    pub fn current_page_number(&self) -> usize {
        self.current_page
    }

    /// Number of pages needed for `len` items; at least 1.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    pub fn reset_page_number(&mut self) {
        self.current_page = 1;
    }

    /// Stores `size` clamped to `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn first_index(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::{Pager, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

    #[test]
    fn seven_items_in_pages_of_three() {
        let items: Vec<u32> = (0..7).collect();
        let mut pager = Pager::new();

        assert!(!pager.prev_page());
        assert_eq!(pager.current_page_items(&items), &[0, 1, 2]);
        assert!(pager.next_page(&items));
        assert_eq!(pager.current_page_items(&items), &[3, 4, 5]);
        assert!(pager.next_page(&items));
        assert_eq!(pager.current_page_items(&items), &[6]);
        assert!(!pager.next_page(&items));
        assert_eq!(pager.current_page_number(), 3);
        assert_eq!(pager.page_count(items.len()), 3);
    }

    #[test]
    fn page_size_is_clamped() {
        let mut pager = Pager::new();
        pager.set_page_size(0);
        assert_eq!(pager.page_size(), MIN_PAGE_SIZE);
        pager.set_page_size(99);
        assert_eq!(pager.page_size(), MAX_PAGE_SIZE);
        assert_eq!(Pager::with_page_size(7).page_size(), 7);
    }

    #[test]
    fn trailing_page_becomes_invalid_after_shrink() {
        let items: Vec<u32> = (0..4).collect();
        let mut pager = Pager::new();
        assert!(pager.next_page(&items));
        assert!(pager.is_current_page_valid(&items));

        let shrunk = &items[..3];
        assert!(!pager.is_current_page_valid(shrunk));
        assert!(pager.current_page_items(shrunk).is_empty());

        assert!(pager.prev_page());
        assert!(pager.is_current_page_valid(shrunk));
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let mut pager = Pager::new();
        assert!(pager.current_page_items(&items).is_empty());
        assert!(!pager.next_page(&items));
        assert!(!pager.is_current_page_valid(&items));
        assert_eq!(pager.page_count(0), 1);
    }
}
