//! Wishlist: a persisted set of saved products keyed by product id.

use std::collections::HashSet;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::persistence::{erase_snapshot, load_snapshot, save_snapshot, KeyValueStore};
use crate::product::{Product, ProductId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub category: String,
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    pub fn from_product(product: &Product, added_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
            thumbnail: product.thumbnail.clone(),
            category: product.category.clone(),
            added_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistState {
    entries: Vec<WishlistEntry>,
}

impl WishlistState {
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WishlistAction {
    Add { entry: WishlistEntry },
    Remove { product_id: ProductId },
    Clear,
}

pub fn reduce_wishlist(mut state: WishlistState, action: &WishlistAction) -> WishlistState {
    match action {
        WishlistAction::Add { entry } => {
            if !state.contains(entry.product_id) {
                state.entries.push(entry.clone());
            }
        }
        WishlistAction::Remove { product_id } => {
            state.entries.retain(|e| e.product_id != *product_id);
        }
        WishlistAction::Clear => state.entries.clear(),
    }
    state
}

pub struct WishlistStore {
    state: WishlistState,
    storage: Rc<dyn KeyValueStore>,
    key: String,
}

impl WishlistStore {
    pub fn new(storage: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut state: WishlistState = load_snapshot(storage.as_ref(), &key);

        // Collapse duplicates a hand-edited snapshot may carry.
        let mut seen = HashSet::with_capacity(state.entries.len());
        state.entries.retain(|e| seen.insert(e.product_id));

        info!("Wishlist hydrated from '{key}' with {} entr(ies)", state.count());
        Self {
            state,
            storage,
            key,
        }
    }

    pub fn state(&self) -> &WishlistState {
        &self.state
    }

    pub fn dispatch(&mut self, action: WishlistAction) -> &WishlistState {
        let state = std::mem::take(&mut self.state);
        self.state = reduce_wishlist(state, &action);

        if matches!(action, WishlistAction::Clear) {
            erase_snapshot(self.storage.as_ref(), &self.key);
        } else {
            save_snapshot(self.storage.as_ref(), &self.key, &self.state);
        }
        &self.state
    }

    /// Saves `product`, stamped with the current time. No-op if already saved.
    pub fn add(&mut self, product: &Product) {
        self.dispatch(WishlistAction::Add {
            entry: WishlistEntry::from_product(product, Utc::now()),
        });
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.dispatch(WishlistAction::Remove { product_id });
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.state.contains(product_id)
    }

    pub fn clear(&mut self) {
        self.dispatch(WishlistAction::Clear);
    }
}
