use shared::protocol::PAGE_SIZE;

/// One-based page counter bounded by an externally supplied page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: u32,
    total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Pagination {
    pub fn new(total_pages: u32) -> Self {
        Self {
            current: 1,
            total_pages: total_pages.max(1),
        }
    }

    /// Number of pages needed for `total` results; never less than one.
    pub fn pages_for(total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(PAGE_SIZE)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn offset(&self) -> u32 {
        Self::offset_for(self.current)
    }

    pub fn offset_for(page: u32) -> u32 {
        page.saturating_sub(1).saturating_mul(PAGE_SIZE)
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Moves to `page` if it is in bounds and returns the new offset; out-of-range pages are ignored.
    pub fn go_to(&mut self, page: u32) -> Option<u32> {
        if page < 1 || page > self.total_pages || page == self.current {
            return None;
        }
        self.current = page;
        Some(self.offset())
    }

    pub fn next(&mut self) -> Option<u32> {
        self.go_to(self.current.saturating_add(1))
    }

    pub fn previous(&mut self) -> Option<u32> {
        self.go_to(self.current.saturating_sub(1))
    }

    /// Updates the bound; returns the new offset if the current page had to be pulled back.
    pub fn set_total_pages(&mut self, total_pages: u32) -> Option<u32> {
        self.total_pages = total_pages.max(1);
        if self.current > self.total_pages {
            self.current = self.total_pages;
            return Some(self.offset());
        }
        None
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
