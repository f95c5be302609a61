//! Pagination query parameters

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_PER_PAGE: usize = 20;
const MAX_PER_PAGE: usize = 100;

/// Pagination query parameters (`?page=1&per_page=20`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    per_page: Option<usize>,
}

impl Pagination {
    /// 1-based page number, clamped to at least 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// Page size, clamped to 1..=100
    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Row offset for the current page
    pub fn offset(&self) -> usize {
        (self.page() - 1) * self.per_page()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
        }
    }
}

/// Pagination metadata echoed in list responses
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl PageInfo {
    /// Build page metadata from the query and the total match count
    pub fn new(pagination: &Pagination, total: usize) -> Self {
        let per_page = pagination.per_page();

        Self {
            page: pagination.page(),
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}
