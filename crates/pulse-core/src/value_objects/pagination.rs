//! Page-number pagination shared by every listing operation

use serde::{Deserialize, Serialize};

/// A 1-based page request with a bounded page size
///
/// Out-of-range values are clamped instead of rejected: a page below 1
/// becomes 1 and a non-positive limit falls back to the listing's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    /// Clamp raw query values using the default limit of 20
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self::with_default_limit(page, limit, Self::DEFAULT_LIMIT)
    }

    /// Clamp raw query values with a listing-specific default limit
    pub fn with_default_limit(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => Self::DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l >= 1 => l.min(Self::MAX_LIMIT),
            _ => default_limit.clamp(1, Self::MAX_LIMIT),
        };
        Self { page, limit }
    }

    /// Number of rows to skip
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Whether rows exist beyond this page given a total count
    #[inline]
    pub fn has_more(&self, total: i64) -> bool {
        self.offset() + self.limit < total
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
