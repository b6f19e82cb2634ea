//! Pagination query parameters and the canonical paged-list envelope.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts to storage offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 100
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), String> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}"));
        }

        let offset = i64::from(page - 1) * i64::from(page_size);
        Ok((offset, i64::from(page_size)))
    }
}

/// Paged list response. Every paged endpoint returns exactly this shape.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    /// Number of the last page; `1` for an empty list.
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        let page_size = params.page_size().max(1);
        let pages = (total_items.max(0) as u64).div_ceil(u64::from(page_size));
        let last_page = u32::try_from(pages).unwrap_or(u32::MAX).max(1);

        Self {
            items,
            pagination: PaginationMeta {
                page: params.page(),
                page_size,
                total_items,
                last_page,
            },
        }
    }
}
