/// Offset paging for newest-first listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Maximum number of rows returned.
    pub limit: usize,
    /// Number of rows skipped.
    pub offset: usize,
}

impl PageQuery {
    /// Largest page a caller may request.
    pub const MAX_LIMIT: usize = 200;

    /// Largest offset a caller may request.
    pub const MAX_OFFSET: usize = 5_000;

    /// Creates a query with the limit clamped to `1..=200` and offset capped at 5000.
    #[must_use]
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset: offset.min(Self::MAX_OFFSET),
        }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(50, 0)
    }
}
