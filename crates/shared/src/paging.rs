use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::models::PageState;

/// Paged view over an ordered list.
///
/// Pages are 1-based. The list itself is never reordered or modified; it is
/// only replaced wholesale through [`Paginator::replace`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginator<T> {
    items: Vec<T>,
    current_page: usize,
    page_size: usize,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Paginator::new(Vec::new(), DEFAULT_PAGE_SIZE)
    }
}

impl<T> Paginator<T> {
    /// A page size of zero is treated as one.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Paginator {
            items,
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Swap in a new list and go back to the first page.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Items on the current page. Empty when the page is past the end.
    pub fn current_slice(&self) -> &[T] {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(self.items.len());
        let end = start.saturating_add(self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn go_next(&mut self) {
        if self.has_next() {
            self.current_page += 1;
        }
    }

    pub fn go_previous(&mut self) {
        if self.has_previous() {
            self.current_page -= 1;
        }
    }

    /// Jump to `page`. Zero and the current page are ignored.
    ///
    /// The page is not checked against [`Paginator::total_pages`]: callers
    /// are expected to offer only numbers from [`Paginator::page_window`].
    pub fn go_to(&mut self, page: usize) {
        if page == 0 || page == self.current_page {
            return;
        }
        self.current_page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Page numbers to show as controls: a run of at most `max_visible`
    /// pages centered on the current one, shifted left when it would run
    /// past the last page. Empty when there is at most one page.
    pub fn page_window(&self, max_visible: usize) -> Vec<usize> {
        let total = self.total_pages();
        if total <= 1 || max_visible == 0 {
            return Vec::new();
        }

        let mut start = self.current_page.saturating_sub(max_visible / 2).max(1);
        let end = total.min(start + max_visible - 1);
        if end + 1 < start + max_visible {
            start = (end + 1).saturating_sub(max_visible).max(1);
        }
        (start..=end).collect()
    }

    /// e.g. "Showing 6-10 of 12 accounts". Empty when there are no items.
    pub fn summary_text(&self) -> String {
        let total = self.items.len();
        if total == 0 {
            return String::new();
        }
        let first = self.current_page.saturating_sub(1) * self.page_size + 1;
        let last = (self.current_page * self.page_size).min(total);
        format!("Showing {}-{} of {} accounts", first, last, total)
    }

    /// Pagination controls are only needed when the list overflows a page.
    pub fn show_pagination(&self) -> bool {
        self.items.len() > self.page_size
    }

    pub fn is_active_page(&self, page: usize) -> bool {
        page == self.current_page
    }

    pub fn page_state(&self) -> PageState {
        PageState {
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.items.len(),
            total_pages: self.total_pages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(n: usize, page_size: usize) -> Paginator<usize> {
        Paginator::new((1..=n).collect(), page_size)
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(pager(0, 5).total_pages(), 0);
        assert_eq!(pager(1, 5).total_pages(), 1);
        assert_eq!(pager(5, 5).total_pages(), 1);
        assert_eq!(pager(12, 5).total_pages(), 3);
        assert_eq!(pager(50, 10).total_pages(), 5);
        assert_eq!(pager(51, 10).total_pages(), 6);
    }

    #[test]
    fn test_current_slice() {
        let mut p = pager(12, 5);
        assert_eq!(p.current_slice(), &[1, 2, 3, 4, 5]);
        p.go_to(3);
        assert_eq!(p.current_slice(), &[11, 12]);
    }

    #[test]
    fn test_current_slice_empty() {
        let p = pager(0, 5);
        assert!(p.current_slice().is_empty());
    }

    #[test]
    fn test_current_slice_is_idempotent() {
        let p = pager(12, 5);
        assert_eq!(p.current_slice().to_vec(), p.current_slice().to_vec());
    }

    #[test]
    fn test_next_and_previous() {
        let mut p = pager(12, 5);
        assert!(!p.has_previous());
        assert!(p.has_next());

        p.go_previous();
        assert_eq!(p.current_page(), 1);

        p.go_next();
        p.go_next();
        assert_eq!(p.current_page(), 3);
        assert!(!p.has_next());

        p.go_next();
        assert_eq!(p.current_page(), 3);

        p.go_previous();
        assert_eq!(p.current_page(), 2);
        assert!(p.has_previous());
    }

    #[test]
    fn test_go_to_ignores_zero_and_current() {
        let mut p = pager(12, 5);
        p.go_to(0);
        assert_eq!(p.current_page(), 1);
        p.go_to(2);
        assert_eq!(p.current_page(), 2);
        p.go_to(2);
        assert_eq!(p.current_page(), 2);
    }

    #[test]
    fn test_go_to_out_of_range_is_accepted() {
        let mut p = pager(12, 5);
        p.go_to(10);
        assert_eq!(p.current_page(), 10);
        assert!(p.current_slice().is_empty());
        assert!(!p.has_next());
        assert!(p.has_previous());
        // The window still shows the last valid pages.
        assert_eq!(p.page_window(5), vec![1, 2, 3]);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut p = pager(100, 5);
        p.go_to(4);
        p.set_page_size(10);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.page_size(), 10);
        assert_eq!(p.total_pages(), 10);
    }

    #[test]
    fn test_set_page_size_zero_is_one() {
        let mut p = pager(3, 5);
        p.set_page_size(0);
        assert_eq!(p.page_size(), 1);
        assert_eq!(p.total_pages(), 3);
    }

    #[test]
    fn test_replace_resets_page() {
        let mut p = pager(12, 5);
        p.go_to(3);
        p.replace(vec![7, 8]);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.current_slice(), &[7, 8]);
    }

    #[test]
    fn test_page_window_three_pages() {
        let mut p = pager(12, 5);
        assert_eq!(p.page_window(5), vec![1, 2, 3]);
        p.go_to(2);
        assert_eq!(p.page_window(5), vec![1, 2, 3]);
        p.go_to(3);
        assert_eq!(p.page_window(5), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_window_single_page_is_empty() {
        assert!(pager(5, 5).page_window(5).is_empty());
        assert!(pager(0, 5).page_window(5).is_empty());
    }

    #[test]
    fn test_page_window_slides() {
        let mut p = pager(100, 5); // 20 pages
        assert_eq!(p.page_window(5), vec![1, 2, 3, 4, 5]);
        p.go_to(3);
        assert_eq!(p.page_window(5), vec![1, 2, 3, 4, 5]);
        p.go_to(4);
        assert_eq!(p.page_window(5), vec![2, 3, 4, 5, 6]);
        p.go_to(10);
        assert_eq!(p.page_window(5), vec![8, 9, 10, 11, 12]);
        p.go_to(19);
        assert_eq!(p.page_window(5), vec![16, 17, 18, 19, 20]);
        p.go_to(20);
        assert_eq!(p.page_window(5), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_page_window_is_contiguous_and_covers_current() {
        for n in 1..=60 {
            let mut p = pager(n, 5);
            let total = p.total_pages();
            for page in 1..=total {
                p.go_to(page);
                let window = p.page_window(5);
                assert!(window.len() <= total.min(5));
                assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
                if total >= 2 {
                    assert!(window.contains(&page));
                }
                if total >= 5 {
                    assert_eq!(window.len(), 5);
                }
            }
        }
    }

    #[test]
    fn test_page_window_even_width() {
        let mut p = pager(100, 10);
        p.go_to(5);
        assert_eq!(p.page_window(4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_summary_text() {
        let mut p = pager(12, 5);
        assert_eq!(p.summary_text(), "Showing 1-5 of 12 accounts");
        p.go_to(3);
        assert_eq!(p.summary_text(), "Showing 11-12 of 12 accounts");
        assert_eq!(pager(0, 5).summary_text(), "");
    }

    #[test]
    fn test_show_pagination_and_active_page() {
        assert!(!pager(5, 5).show_pagination());
        assert!(pager(6, 5).show_pagination());
        let p = pager(12, 5);
        assert!(p.is_active_page(1));
        assert!(!p.is_active_page(2));
    }

    #[test]
    fn test_page_state() {
        let mut p = pager(12, 5);
        p.go_next();
        assert_eq!(
            p.page_state(),
            PageState {
                current_page: 2,
                page_size: 5,
                total_items: 12,
                total_pages: 3,
            }
        );
    }
}
