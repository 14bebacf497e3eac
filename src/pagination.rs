//! Page arithmetic for paginated list endpoints.

/// Page size used when the requested one is missing or not positive.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page: u64,
    page_size: u64,
    count: u64,
}

impl Paginator {
    /// `page` is clamped into `[1, total_pages]` (or 1 when there are no records).
    pub fn new(page: i64, page_size: i64, count: u64) -> Self {
        let page_size = if page_size > 0 { page_size as u64 } else { DEFAULT_PAGE_SIZE };
        let total_pages = count.div_ceil(page_size);
        let page = if page <= 0 { 1 } else { (page as u64).min(total_pages).max(1) };
        Paginator { page, page_size, count }
    }

    /// Parses raw query values; non-numeric input falls back like a zero.
    pub fn from_query(page: &str, page_size: &str, count: u64) -> Self {
        Paginator::new(parse_int(page), parse_int(page_size), count)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.count.div_ceil(self.page_size)
    }
}

fn parse_int(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}
