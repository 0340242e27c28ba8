//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Maximum page size accepted by list endpoints.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Clamps `page` to at least 1 and `per_page` to `1..=100`, then
    /// computes the page count for `total` items.
    #[must_use]
    pub fn new(page: u32, per_page: u32, total: u32) -> Self {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize)
    }
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_per_page() -> u32 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_counts_pages() {
        let meta = PaginationMeta::new(0, 500, 250);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.per_page, MAX_PER_PAGE);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.offset(), 0);
    }

    #[test]
    fn offset_of_later_page() {
        let meta = PaginationMeta::new(3, 20, 45);
        assert_eq!(meta.offset(), 40);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        assert_eq!(PaginationMeta::new(1, 20, 0).total_pages, 0);
    }
}
