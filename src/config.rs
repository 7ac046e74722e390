//! Storefront configuration.
//!
//! Accepted as JSON across the FFI boundary. Every field has a default, so
//! `{}` is a complete configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CART_KEY: &str = "flaerHomes_cart";
pub const DEFAULT_WISHLIST_KEY: &str = "flaerHomes_wishlist";
pub const DEFAULT_MAX_PRICE: f64 = 2000.0;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorefrontConfig {
    /// Storage key of the cart snapshot.
    pub cart_key: String,
    /// Storage key of the wishlist snapshot.
    pub wishlist_key: String,
    /// LMDB environment name. `None` keeps snapshots in memory.
    pub storage_path: Option<String>,
    /// Upper bound of the default (unfiltered) price span.
    pub max_price: f64,
    pub page_size: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            wishlist_key: DEFAULT_WISHLIST_KEY.to_string(),
            storage_path: None,
            max_price: DEFAULT_MAX_PRICE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StorefrontConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
