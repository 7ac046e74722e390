//! Catalog filter and pagination state.
//!
//! Every filter change sends the page cursor back to 1, since the
//! accumulated result list no longer matches the new filters. Only
//! [`FilterAction::SetCurrentPage`] moves the cursor without touching
//! anything else.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MAX_PRICE, DEFAULT_PAGE_SIZE};
use crate::product::Product;

pub const ALL_CATEGORIES: &str = "all";
pub const MAX_RATING: f64 = 5.0;

/// Category filter; `"all"` on the wire means unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(trimmed.to_string())
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Category(key) => key,
        }
    }
}

impl CategoryFilter {
    pub fn key(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Category(key) => Some(key),
        }
    }
}

/// Inclusive bounds on the discounted price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Builds a range with non-negative bounds in ascending order.
    pub fn new(min: f64, max: f64) -> Self {
        let min = if min.is_nan() { 0.0 } else { min.max(0.0) };
        let max = if max.is_nan() { 0.0 } else { max.max(0.0) };
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_MAX_PRICE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Title,
    Price,
    Rating,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Title => "title",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub skip: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub category: CategoryFilter,
    pub price_range: PriceRange,
    pub min_rating: f64,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub search_text: String,
    pub current_page: u32,
    pub page_size: u32,
    /// The unfiltered price span `ClearFilters` goes back to.
    #[serde(skip)]
    default_price_range: PriceRange,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_MAX_PRICE, DEFAULT_PAGE_SIZE)
    }
}

impl FilterState {
    pub fn with_defaults(max_price: f64, page_size: u32) -> Self {
        let price_range = PriceRange::new(0.0, max_price);
        let page_size = page_size.max(1);
        Self {
            category: CategoryFilter::All,
            price_range,
            min_rating: 0.0,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            search_text: String::new(),
            current_page: 1,
            page_size,
            default_price_range: price_range,
        }
    }

    pub fn default_price_range(&self) -> PriceRange {
        self.default_price_range
    }

    /// Number of results to skip for the current page.
    pub fn skip(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            current_page: self.current_page,
            page_size: self.page_size,
            skip: self.skip(),
        }
    }

    pub fn sort_params(&self) -> (SortKey, SortDirection) {
        (self.sort_key, self.sort_direction)
    }

    /// Count of filters that differ from their defaults, for badge display.
    pub fn active_filter_count(&self) -> usize {
        [
            self.category != CategoryFilter::All,
            self.price_range != self.default_price_range,
            self.min_rating > 0.0,
            !self.search_text.trim().is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Client-side predicate for the filters the catalog cannot apply:
    /// discounted price within the range and rating at or above the floor.
    ///
    /// The default span means unfiltered, so products priced above it are
    /// kept until the user narrows the range.
    pub fn accepts(&self, product: &Product) -> bool {
        let price_ok = self.price_range == self.default_price_range
            || self.price_range.contains(product.discounted_price());
        price_ok && product.rating >= self.min_rating
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FilterAction {
    SetCategory { category: CategoryFilter },
    SetPriceRange { min: f64, max: f64 },
    SetMinRating { rating: f64 },
    SetSortBy { sort_key: SortKey },
    SetSortDirection { direction: SortDirection },
    SetSearchText { text: String },
    SetPageSize { page_size: u32 },
    SetCurrentPage { page: u32 },
    ResetPagination,
    /// Resets everything except the sort preference and page size.
    ClearFilters,
}

pub fn reduce_filters(mut state: FilterState, action: &FilterAction) -> FilterState {
    match action {
        FilterAction::SetCategory { category } => {
            state.category = category.clone();
            state.current_page = 1;
        }
        FilterAction::SetPriceRange { min, max } => {
            state.price_range = PriceRange::new(*min, *max);
            state.current_page = 1;
        }
        FilterAction::SetMinRating { rating } => {
            state.min_rating = if rating.is_nan() {
                0.0
            } else {
                rating.clamp(0.0, MAX_RATING)
            };
            state.current_page = 1;
        }
        FilterAction::SetSortBy { sort_key } => {
            state.sort_key = *sort_key;
            state.current_page = 1;
        }
        FilterAction::SetSortDirection { direction } => {
            state.sort_direction = *direction;
            state.current_page = 1;
        }
        FilterAction::SetSearchText { text } => {
            state.search_text = text.clone();
            state.current_page = 1;
        }
        FilterAction::SetPageSize { page_size } => {
            state.page_size = (*page_size).max(1);
            state.current_page = 1;
        }
        FilterAction::SetCurrentPage { page } => {
            state.current_page = (*page).max(1);
        }
        FilterAction::ResetPagination => {
            state.current_page = 1;
        }
        FilterAction::ClearFilters => {
            state.category = CategoryFilter::All;
            state.price_range = state.default_price_range;
            state.min_rating = 0.0;
            state.search_text.clear();
            state.current_page = 1;
        }
    }
    state
}

/// Owns the filter state for one session. Filters are not persisted.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
}

impl FilterStore {
    pub fn new(state: FilterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn dispatch(&mut self, action: FilterAction) -> &FilterState {
        let state = std::mem::take(&mut self.state);
        self.state = reduce_filters(state, &action);
        &self.state
    }

    pub fn set_category(&mut self, category: impl Into<CategoryFilter>) {
        self.dispatch(FilterAction::SetCategory {
            category: category.into(),
        });
    }

    pub fn set_price_range(&mut self, min: f64, max: f64) {
        self.dispatch(FilterAction::SetPriceRange { min, max });
    }

    pub fn set_min_rating(&mut self, rating: f64) {
        self.dispatch(FilterAction::SetMinRating { rating });
    }

    pub fn set_sort_by(&mut self, sort_key: SortKey) {
        self.dispatch(FilterAction::SetSortBy { sort_key });
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.dispatch(FilterAction::SetSortDirection { direction });
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.dispatch(FilterAction::SetSearchText { text: text.into() });
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.dispatch(FilterAction::SetPageSize { page_size });
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.dispatch(FilterAction::SetCurrentPage { page });
    }

    pub fn reset_pagination(&mut self) {
        self.dispatch(FilterAction::ResetPagination);
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(FilterAction::ClearFilters);
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }
}
