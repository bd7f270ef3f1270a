//! Limit/offset pagination for listings.

/// Page size settings.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Used when a client sends `offset` without `limit`.
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    /// Resolve raw query values. Pagination is only engaged when the client
    /// asks for it; unparsable values fall back to defaults.
    pub fn resolve(&self, limit: Option<&str>, offset: Option<&str>) -> Option<PageRequest> {
        if limit.is_none() && offset.is_none() {
            return None;
        }

        let limit = limit
            .and_then(|l| l.trim().parse::<u64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(self.default_limit)
            .min(self.max_limit);
        let offset = offset
            .and_then(|o| o.trim().parse::<u64>().ok())
            .unwrap_or(0);

        Some(PageRequest { limit, offset })
    }
}

/// Either the whole collection or one page of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    All(Vec<T>),
    Page {
        count: u64,
        request: PageRequest,
        results: Vec<T>,
    },
}

impl PageRequest {
    /// Offset of the next page, if there is one.
    pub fn next_offset(&self, count: u64) -> Option<u64> {
        let next = self.offset.saturating_add(self.limit);
        (next < count).then_some(next)
    }

    /// Offset of the previous page, if there is one.
    pub fn previous_offset(&self) -> Option<u64> {
        (self.offset > 0).then(|| self.offset.saturating_sub(self.limit))
    }
}
