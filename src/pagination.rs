// ABOUTME: Page/limit query parsing and the pagination response block
// ABOUTME: Shared by every paginated listing endpoint
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Pagination helpers for listing endpoints

use serde::{Deserialize, Serialize};

/// Default page size for listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on requested page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page/limit query parameters accepted by listing endpoints
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Items per page
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Effective 1-based page number
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to [1, `MAX_PAGE_SIZE`]
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the effective page
    #[must_use]
    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination block included in listing responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Current 1-based page
    pub current: u32,
    /// Total number of pages
    pub pages: u32,
    /// Total matching items
    pub total: u64,
    /// Items per page
    pub limit: u32,
}

impl Pagination {
    /// Build the block from the effective query and total match count
    #[must_use]
    pub fn new(query: PageQuery, total: u64) -> Self {
        let limit = query.limit();
        let pages = u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);
        Self {
            current: query.page(),
            pages,
            total,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset(), 0);

        let q = PageQuery {
            page: Some(0),
            limit: Some(100_000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_pagination_block() {
        let q = PageQuery {
            page: Some(2),
            limit: Some(10),
        };
        let p = Pagination::new(q, 25);
        assert_eq!(p.current, 2);
        assert_eq!(p.pages, 3);
        assert_eq!(p.total, 25);
        assert_eq!(q.offset(), 10);
    }
}
