//! Page/limit options and the metadata returned with every paged list.

use serde::Serialize;

use crate::validation::{check_range, ValidationErrors};

/// First page number; pages are 1-based.
pub const MIN_PAGE: i64 = 1;

/// Smallest accepted page size.
pub const MIN_LIMIT: i64 = 1;

/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 1000;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;

/// A validated `(page, limit)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    page: i64,
    limit: i64,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page: MIN_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PaginationOptions {
    /// Build options from optional inputs, applying defaults.
    ///
    /// `page` must be at least [`MIN_PAGE`]; `limit` must lie in
    /// [`MIN_LIMIT`]`..=`[`MAX_LIMIT`]. Out-of-range values are rejected,
    /// never clamped.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let options = Self::collect(page, limit, &mut errors);
        errors.into_result(options)
    }

    /// Like [`PaginationOptions::new`], but appends to an existing error list
    /// so callers validating a larger input can report everything at once.
    pub fn collect(page: Option<i64>, limit: Option<i64>, errors: &mut ValidationErrors) -> Self {
        let page = page.unwrap_or(MIN_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        check_range(page, MIN_PAGE, i64::MAX, "page", errors);
        check_range(limit, MIN_LIMIT, MAX_LIMIT, "limit", errors);
        Self { page, limit }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip before the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// `ceil(total_items / limit)`; zero when there are no items.
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    if total_items <= 0 || limit <= 0 {
        return 0;
    }
    (total_items + limit - 1) / limit
}

/// Metadata describing one page of a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Matching rows across all pages.
    pub total_items: i64,
    /// Rows on this page.
    pub item_count: i64,
    /// The effective limit.
    pub items_per_page: i64,
    pub total_pages: i64,
    /// The requested page, even when it lies past the last one.
    pub current_page: i64,
}

impl PaginationMeta {
    pub fn new(total_items: i64, item_count: usize, options: PaginationOptions) -> Self {
        Self {
            total_items,
            item_count: i64::try_from(item_count).unwrap_or(i64::MAX),
            items_per_page: options.limit,
            total_pages: total_pages(total_items, options.limit),
            current_page: options.page,
        }
    }
}

/// One page of items plus its [`PaginationMeta`].
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total_items: i64, options: PaginationOptions) -> Self {
        let meta = PaginationMeta::new(total_items, items.len(), options);
        Self { items, meta }
    }
}
