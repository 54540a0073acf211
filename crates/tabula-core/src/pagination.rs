//! Paging requests for list operations.

use serde::{Deserialize, Serialize};

/// A request for one page of rows.
///
/// Pages are 1-indexed. A page number of `0` or a page size of `0`
/// disables paging entirely: no offset or limit is applied and every
/// matching row is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// The page number (1-indexed, `0` disables paging).
    pub page: u64,
    /// The number of rows per page (`0` disables paging).
    pub page_size: u64,
}

impl Paging {
    /// Creates a new paging request.
    #[must_use]
    pub const fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Returns true if this request restricts the result set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.page_size > 0 && self.page > 0
    }

    /// Returns the offset for database queries.
    ///
    /// Page 1 starts at offset zero.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size
    }

    /// Returns `(offset, limit)` when paging is active.
    #[must_use]
    pub const fn window(&self) -> Option<(u64, u64)> {
        if self.is_active() {
            Some((self.offset(), self.limit()))
        } else {
            None
        }
    }
}

impl From<(u64, u64)> for Paging {
    fn from((page, page_size): (u64, u64)) -> Self {
        Self::new(page, page_size)
    }
}
