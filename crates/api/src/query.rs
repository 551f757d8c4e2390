//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic list parameters (`?q=&limit=&offset=`) shared by the entity
/// list endpoints. `q` is a case-insensitive substring search.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;
/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 200;

impl ListParams {
    /// The effective page size: default 50, capped at 200.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// The effective offset: default 0, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
