use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page-number pagination with a page-size override, shared by every
/// paginated listing.
#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size override (default: 10, max: 100)
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn page_number(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page_number() - 1) * self.page_size()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageMetadata {
    /// Total number of items across all pages
    pub count: i64,
    pub page: i64,
    pub limit: i64,
}

impl PageMetadata {
    pub fn new(count: i64, params: &PageParams) -> Self {
        PageMetadata {
            count,
            page: params.page_number(),
            limit: params.page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = PageParams::default();
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        let params = PageParams {
            page: None,
            limit: Some(100_000),
        };
        assert_eq!(params.page_size(), MAX_PAGE_SIZE);

        let params = PageParams {
            page: None,
            limit: Some(0),
        };
        assert_eq!(params.page_size(), 1);
    }

    #[test]
    fn page_below_one_is_clamped() {
        let params = PageParams {
            page: Some(-3),
            limit: Some(20),
        };
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn offset_uses_page_and_limit() {
        let params = PageParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(params.offset(), 50);
    }
}
