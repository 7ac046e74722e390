//! Request composition for the remote product catalog, and bookkeeping for
//! incremental ("load more") result loading.
//!
//! No I/O happens here. The HTTP client joins [`CatalogQuery::path`] onto
//! its base URL and sends [`CatalogQuery::params`] as the query string.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::filter_state::FilterState;
use crate::product::{Product, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl CatalogQuery {
    /// Maps filter state onto the catalog endpoints.
    ///
    /// The catalog cannot combine search with a category, so non-empty
    /// search text wins. Price range and rating are not understood by the
    /// catalog and are applied client-side through [`FilterState::accepts`].
    pub fn from_filters(filters: &FilterState) -> Self {
        let search = filters.search_text.trim();
        let mut params = Vec::new();

        let path = if !search.is_empty() {
            params.push(("q".to_string(), search.to_string()));
            "products/search".to_string()
        } else if let Some(category) = filters.category.key() {
            format!("products/category/{category}")
        } else {
            "products".to_string()
        };

        params.push(("limit".to_string(), filters.page_size.to_string()));
        let skip = filters.skip();
        if skip > 0 {
            params.push(("skip".to_string(), skip.to_string()));
        }
        params.push(("sortBy".to_string(), filters.sort_key.as_str().to_string()));
        params.push(("order".to_string(), filters.sort_direction.as_str().to_string()));

        Self { path, params }
    }

    /// Request for the list of category keys accepted by `SetCategory`.
    pub fn categories() -> Self {
        Self {
            path: "products/categories".to_string(),
            params: Vec::new(),
        }
    }

    /// Request for a single product, as shown on its detail page.
    pub fn product(id: ProductId) -> Self {
        Self {
            path: format!("products/{id}"),
            params: Vec::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn default_limit() -> u32 {
    20
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<Product>,
    /// Total matches across all pages.
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Results accumulated across pages for infinite scrolling.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAccumulator {
    products: Vec<Product>,
    total: u64,
    loaded_pages: u32,
    has_more: bool,
}

impl PageAccumulator {
    pub fn new() -> Self {
        Self {
            has_more: true,
            ..Self::default()
        }
    }

    /// Takes in the page fetched for `filters.current_page`.
    ///
    /// Page 1 replaces whatever was loaded; later pages append. Products
    /// rejected by the client-side filters are dropped, but `has_more` is
    /// decided on the raw page count so filtering never stalls paging.
    pub fn receive(&mut self, page: CatalogPage, filters: &FilterState) {
        let accepted = page.products.into_iter().filter(|p| filters.accepts(p));

        if filters.current_page <= 1 {
            self.products = accepted.collect();
        } else {
            self.products.extend(accepted);
        }

        self.total = page.total;
        self.loaded_pages = filters.current_page.max(1);
        let requested = u64::from(self.loaded_pages) * u64::from(filters.page_size);
        self.has_more = requested < page.total;

        debug!(
            "Catalog page {} received: {} product(s) kept, total {}, more: {}",
            self.loaded_pages,
            self.products.len(),
            self.total,
            self.has_more
        );
    }

    /// Page to request next, if the catalog reports more results.
    pub fn next_page(&self) -> Option<u32> {
        self.has_more.then(|| self.loaded_pages + 1)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }
}
