//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

/// Upper bound on `per_page`; larger requests are clamped.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Creates a page request, clamping both values into their valid ranges.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Zero-based page index, as expected by `sea-orm` paginators.
    #[must_use]
    pub fn page_index(&self) -> u64 {
        u64::from(self.page.saturating_sub(1))
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page_index() * self.limit()
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page.clamp(1, MAX_PER_PAGE))
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(request.limit())
        };

        Self {
            data,
            meta: PageMeta {
                page: request.page,
                per_page: request.per_page,
                total,
                total_pages,
            },
        }
    }
}
