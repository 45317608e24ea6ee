//! Pagination utilities for list endpoints.
//!
//! Lists are page-based: `page` is 1-indexed (default 1) and `limit` is the
//! page size (default 10, clamped to 1..=100). Rows are skipped with
//! `skip = (page - 1) * limit`.
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::pagination::{PaginationParams, PageInfo};
//!
//! async fn list_notices(Query(params): Query<PaginationParams>) -> Result<_, AppError> {
//!     let rows = fetch(params.limit(), params.skip()).await?;
//!     let total = count().await?;
//!     let info = PageInfo::new(&params, rows.len(), total);
//!     // { "count": 10, "total": 42, "page": 1, "pages": 5 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query parameters for pagination.
///
/// Both fields are optional and tolerate empty strings (`?page=&limit=`).
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Returns the effective page, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the effective limit, clamped to [1, 100].
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Number of rows to skip: `(page - 1) * limit`, saturating at `i64::MAX`.
    #[must_use]
    pub fn skip(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Pagination summary flattened into list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageInfo {
    /// Number of items in this page
    pub count: i64,
    /// Total number of items matching the filters
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Total number of pages
    pub pages: i64,
}

impl PageInfo {
    pub fn new(params: &PaginationParams, count: usize, total: i64) -> Self {
        let limit = params.limit();
        Self {
            count: count as i64,
            total,
            page: params.page(),
            pages: (total + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.skip(), 0);
    }

    #[test]
    fn test_skip_is_page_minus_one_times_limit() {
        let params = PaginationParams::new(3, 25);
        assert_eq!(params.skip(), 50);
    }

    #[test]
    fn test_skip_saturates_for_huge_page() {
        let params = PaginationParams::new(i64::MAX, 100);
        assert_eq!(params.page(), i64::MAX);
        assert_eq!(params.skip(), i64::MAX);
    }

    #[test]
    fn test_clamping() {
        let params = PaginationParams::new(-5, 200);
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 100);

        let params = PaginationParams::new(2, 0);
        assert_eq!(params.limit(), 1);
        assert_eq!(params.skip(), 1);
    }

    #[test]
    fn test_page_info_rounds_pages_up() {
        let params = PaginationParams::new(1, 10);
        let info = PageInfo::new(&params, 10, 42);
        assert_eq!(info.pages, 5);
        assert_eq!(info.count, 10);

        let info = PageInfo::new(&params, 0, 0);
        assert_eq!(info.pages, 0);
    }

    #[test]
    fn test_deserialize_from_query_strings() {
        let params: PaginationParams =
            serde_json::from_value(serde_json::json!({ "page": "2", "limit": "" })).unwrap();
        assert_eq!(params.page(), 2);
        assert_eq!(params.limit(), 10);
    }
}
