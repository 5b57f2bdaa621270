//! Pagination
//!
//! `page`/`limit` query handling shared by every list endpoint.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Raw `page`/`limit` query parameters.
///
/// Kept as strings so a malformed value surfaces as a field error
/// instead of a generic query rejection.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn parse(&self) -> Result<PageRequest, ValidationErrors> {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate raw values; absent or blank values take the defaults.
    ///
    /// ```rust
    /// use kernel::pagination::PageRequest;
    ///
    /// let req = PageRequest::parse(Some("3"), None).unwrap();
    /// assert_eq!((req.page(), req.limit(), req.offset()), (3, 10, 20));
    /// assert!(PageRequest::parse(None, Some("101")).is_err());
    /// ```
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let page = errors.check_optional(
            "page",
            non_blank(page).map(|raw| match raw.parse::<u32>() {
                Ok(p) if p >= 1 => Ok(p),
                _ => Err("Page must be a positive integer"),
            }),
        );
        let limit = errors.check_optional(
            "limit",
            non_blank(limit).map(|raw| match raw.parse::<u32>() {
                Ok(l) if (1..=MAX_LIMIT).contains(&l) => Ok(l),
                _ => Err("Limit must be between 1 and 100"),
            }),
        );

        errors.into_result()?;
        Ok(Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        })
    }

    /// Build without validation, clamping into range
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Pagination metadata for `total` matching rows
    pub fn meta(&self, total: i64) -> Pagination {
        Pagination::new(self.page, self.limit, total)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i = i64::from(limit.max(1));
        let total = total.max(0);
        Self {
            page,
            limit,
            total,
            total_pages: (total + limit_i - 1) / limit_i,
        }
    }
}

/// One page of rows with its metadata
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            pagination: request.meta(total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
