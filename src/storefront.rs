//! Application root: every store of one browsing session over one shared
//! storage handle.

use std::rc::Rc;

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::cart_store::CartStore;
use crate::catalog_query::{CatalogPage, CatalogQuery, PageAccumulator};
use crate::config::StorefrontConfig;
use crate::filter_state::{FilterAction, FilterState, FilterStore};
use crate::lmdb_store::LmdbStore;
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::product::{Product, ProductId};
use crate::promo::PromoTable;
use crate::store_error::PersistenceError;
use crate::wishlist_store::{WishlistAction, WishlistEntry, WishlistStore};

/// Wishlist intent as sent by a UI. `Add` is stamped with the current time
/// before it reaches the reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WishlistCommand {
    Add { product: Product },
    Remove { product_id: ProductId },
    Clear,
}

impl WishlistCommand {
    pub fn into_action(self) -> WishlistAction {
        match self {
            WishlistCommand::Add { product } => WishlistAction::Add {
                entry: WishlistEntry::from_product(&product, Utc::now()),
            },
            WishlistCommand::Remove { product_id } => WishlistAction::Remove { product_id },
            WishlistCommand::Clear => WishlistAction::Clear,
        }
    }
}

pub struct Storefront {
    pub cart: CartStore,
    pub filters: FilterStore,
    pub wishlist: WishlistStore,
    results: PageAccumulator,
    config: StorefrontConfig,
}

impl Storefront {
    /// Opens the configured storage (LMDB when `storage_path` is set,
    /// memory otherwise) and hydrates the stores from it.
    pub fn open(config: StorefrontConfig) -> Result<Self, PersistenceError> {
        let storage: Rc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Rc::new(LmdbStore::open(path)?),
            None => {
                info!("No storage path configured, keeping snapshots in memory");
                Rc::new(MemoryStore::new())
            }
        };
        Ok(Self::with_storage(config, storage))
    }

    pub fn with_storage(config: StorefrontConfig, storage: Rc<dyn KeyValueStore>) -> Self {
        let cart = CartStore::new(Rc::clone(&storage), PromoTable::default(), &config.cart_key);
        let wishlist = WishlistStore::new(storage, &config.wishlist_key);
        let filters = FilterStore::new(FilterState::with_defaults(
            config.max_price,
            config.page_size,
        ));

        Self {
            cart,
            filters,
            wishlist,
            results: PageAccumulator::new(),
            config,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Applies a filter action. Anything but a page move invalidates the
    /// accumulated results.
    pub fn dispatch_filters(&mut self, action: FilterAction) -> &FilterState {
        if !matches!(action, FilterAction::SetCurrentPage { .. }) {
            self.results.reset();
        }
        self.filters.dispatch(action)
    }

    pub fn dispatch_wishlist(&mut self, command: WishlistCommand) {
        self.wishlist.dispatch(command.into_action());
    }

    /// Request for the page the filter state currently points at.
    pub fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery::from_filters(self.filters.state())
    }

    pub fn receive_page(&mut self, page: CatalogPage) -> &PageAccumulator {
        self.results.receive(page, self.filters.state());
        &self.results
    }

    /// Moves the cursor to the next page if more results remain, returning
    /// the query to fetch it.
    pub fn load_more(&mut self) -> Option<CatalogQuery> {
        let page = self.results.next_page()?;
        self.filters.set_current_page(page);
        Some(self.catalog_query())
    }

    pub fn results(&self) -> &PageAccumulator {
        &self.results
    }
}
