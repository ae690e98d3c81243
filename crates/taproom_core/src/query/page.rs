//! Page requests and page results.
//!
//! # Invariants
//! - A normalized `PageRequest` always has `page_size` in `1..=MAX_PAGE_SIZE`.
//! - Pages are sorted ascending by record name, ties broken by id.

use serde::Serialize;

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Bounded page window handed to persistence providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    /// Clamps raw caller input into a safe page window.
    ///
    /// - Missing or non-positive page numbers fall back to page 0.
    /// - Missing or non-positive sizes fall back to `DEFAULT_PAGE_SIZE`.
    /// - Sizes at or above `MAX_PAGE_SIZE` are clamped to it.
    pub fn normalize(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        let page_number = match page_number {
            Some(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
            _ => DEFAULT_PAGE_NUMBER,
        };
        let page_size = match page_size {
            Some(value) if value >= i64::from(MAX_PAGE_SIZE) => MAX_PAGE_SIZE,
            Some(value) if value > 0 => value as u32,
            _ => DEFAULT_PAGE_SIZE,
        };
        Self {
            page_number,
            page_size,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of sorted rows preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::normalize(None, None)
    }
}

/// One page of results plus the metadata needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching rows across all pages.
    pub total_elements: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total_elements,
            page_number: request.page_number(),
            page_size: request.page_size(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.page_size))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

    #[test]
    fn missing_and_non_positive_values_use_defaults() {
        for (number, size) in [(None, None), (Some(0), Some(0)), (Some(-3), Some(-10))] {
            let request = PageRequest::normalize(number, size);
            assert_eq!(request.page_number(), 0);
            assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
        }
    }

    #[test]
    fn oversized_requests_clamp_to_max() {
        assert_eq!(
            PageRequest::normalize(None, Some(1000)).page_size(),
            MAX_PAGE_SIZE
        );
        assert_eq!(
            PageRequest::normalize(None, Some(i64::MAX)).page_size(),
            MAX_PAGE_SIZE
        );
        assert_eq!(PageRequest::normalize(None, Some(999)).page_size(), 999);
    }

    #[test]
    fn normalized_bounds_hold_across_inputs() {
        let samples = [i64::MIN, -1, 0, 1, 2, 24, 25, 26, 999, 1000, 1001, i64::MAX];
        for number in samples {
            for size in samples {
                let request = PageRequest::normalize(Some(number), Some(size));
                assert!(request.page_size() > 0 && request.page_size() <= MAX_PAGE_SIZE);
                if size >= 1000 {
                    assert_eq!(request.page_size(), MAX_PAGE_SIZE);
                }
            }
        }
    }

    #[test]
    fn offset_and_total_pages() {
        let request = PageRequest::normalize(Some(2), Some(10));
        assert_eq!(request.offset(), 20);

        let page = Page::new(vec![1, 2, 3], 21, &request);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.map(|n| n * 2).items, vec![2, 4, 6]);
    }
}
