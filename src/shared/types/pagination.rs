use serde::Serialize;

/// Largest page a listing may return.
pub const MAX_PAGE_SIZE: u32 = 10;

/// Listing request parameters, normalized on assignment.
///
/// `page_size` is always within `1..=MAX_PAGE_SIZE`; a zero or negative
/// request falls back to `MAX_PAGE_SIZE`. `search` is stored lower-cased so
/// substring filters built from it are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationParams {
    page_index: u32,
    page_size: u32,
    search: String,
    sort: Option<String>,
    is_active: Option<bool>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: MAX_PAGE_SIZE,
            search: String::new(),
            sort: None,
            is_active: None,
        }
    }
}

impl PaginationParams {
    pub fn new(page_index: i64, page_size: i64) -> Self {
        let mut params = Self::default();
        params.set_page_index(page_index);
        params.set_page_size(page_size);
        params
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn is_active(&self) -> Option<bool> {
        self.is_active
    }

    pub fn set_page_index(&mut self, page_index: i64) {
        self.page_index = u32::try_from(page_index.max(1)).unwrap_or(u32::MAX);
    }

    pub fn set_page_size(&mut self, page_size: i64) {
        self.page_size = if page_size < 1 {
            MAX_PAGE_SIZE
        } else {
            page_size.min(i64::from(MAX_PAGE_SIZE)) as u32
        };
    }

    pub fn set_search(&mut self, search: impl AsRef<str>) {
        self.search = search.as_ref().trim().to_lowercase();
    }

    pub fn set_sort(&mut self, sort: Option<impl Into<String>>) {
        self.sort = sort.map(Into::into);
    }

    pub fn set_is_active(&mut self, is_active: Option<bool>) {
        self.is_active = is_active;
    }

    pub fn with_search(mut self, search: impl AsRef<str>) -> Self {
        self.set_search(search);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.set_sort(Some(sort));
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.set_is_active(Some(is_active));
        self
    }

    /// Number of rows preceding the requested page.
    pub fn skip(&self) -> usize {
        (self.page_index as usize - 1).saturating_mul(self.page_size as usize)
    }

    pub fn take(&self) -> usize {
        self.page_size as usize
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub page_size: u32,
    pub page_index: u32,
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_index: u32, page_size: u32) -> Self {
        Self {
            page_size,
            page_index,
            total_count,
            items,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        u32::try_from(self.total_count.div_ceil(u64::from(self.page_size))).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_capped() {
        assert_eq!(PaginationParams::new(1, 15).page_size(), 10);
        assert_eq!(PaginationParams::new(1, 10).page_size(), 10);
        assert_eq!(PaginationParams::new(1, 3).page_size(), 3);
    }

    #[test]
    fn non_positive_page_size_uses_default() {
        assert_eq!(PaginationParams::new(1, 0).page_size(), MAX_PAGE_SIZE);
        assert_eq!(PaginationParams::new(1, -4).page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn page_index_starts_at_one() {
        assert_eq!(PaginationParams::default().page_index(), 1);
        assert_eq!(PaginationParams::new(0, 5).page_index(), 1);
        assert_eq!(PaginationParams::new(-2, 5).page_index(), 1);
    }

    #[test]
    fn search_is_lower_cased() {
        let params = PaginationParams::default().with_search("  Cairo Branch ");
        assert_eq!(params.search(), "cairo branch");
    }

    #[test]
    fn skip_and_take_follow_page() {
        let params = PaginationParams::new(3, 4);
        assert_eq!(params.skip(), 8);
        assert_eq!(params.take(), 4);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: PaginatedResult<u8> = PaginatedResult::new(vec![], 21, 1, 10);
        assert_eq!(page.total_pages(), 3);
        let empty: PaginatedResult<u8> = PaginatedResult::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn extreme_values_saturate() {
        let params = PaginationParams::new(i64::MAX, 10);
        assert_eq!(params.page_index(), u32::MAX);
        assert_eq!(params.skip(), (u32::MAX as usize - 1).saturating_mul(10));

        let huge: PaginatedResult<u8> = PaginatedResult::new(vec![], u64::MAX, 1, 1);
        assert_eq!(huge.total_pages(), u32::MAX);
    }

    #[test]
    fn paginated_result_serializes_fields() {
        let page = PaginatedResult::new(vec!["a"], 1, 1, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["total_count"], 1);
        assert_eq!(json["items"][0], "a");
    }
}
