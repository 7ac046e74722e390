//! Cart reducer and the store that owns the cart state.
//!
//! [`reduce_cart`] is a pure function of `(state, action, promo table)`.
//! [`CartStore`] applies it, then persists the result: a snapshot write after
//! every successful action, or an erase after [`CartAction::Clear`].

use std::rc::Rc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::cart_model::{CartLineItem, CartState};
use crate::persistence::{erase_snapshot, load_snapshot, save_snapshot, KeyValueStore};
use crate::product::{Product, ProductId};
use crate::promo::{canonical_code, PromoTable};
use crate::store_error::CartError;

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CartAction {
    AddItem {
        product: Product,
        #[serde(default = "one")]
        quantity: u32,
    },
    RemoveItem {
        product_id: ProductId,
    },
    /// Zero or negative quantities remove the line.
    SetQuantity {
        product_id: ProductId,
        quantity: i64,
    },
    Clear,
    ApplyPromo {
        code: String,
    },
    RemovePromo,
}

/// Computes the state that follows `action`.
///
/// Fails only for [`CartAction::ApplyPromo`] with an unknown code, in which
/// case the caller keeps its previous state.
pub fn reduce_cart(
    mut state: CartState,
    action: &CartAction,
    promos: &PromoTable,
) -> Result<CartState, CartError> {
    match action {
        CartAction::AddItem { product, quantity } => {
            add_item(&mut state, product, *quantity);
        }
        CartAction::RemoveItem { product_id } => {
            state.line_items.retain(|item| item.product_id != *product_id);
        }
        CartAction::SetQuantity {
            product_id,
            quantity,
        } => {
            set_quantity(&mut state, *product_id, *quantity);
        }
        CartAction::Clear => {
            state = CartState::default();
        }
        CartAction::ApplyPromo { code } => {
            let code = canonical_code(code);
            let rule = promos
                .lookup(&code)
                .ok_or_else(|| CartError::InvalidPromoCode(code.clone()))?;
            state.discount_amount = rule.discount_for(state.subtotal);
            state.promo_code = Some(code);
        }
        CartAction::RemovePromo => {
            state.promo_code = None;
            state.discount_amount = 0.0;
        }
    }

    recalculate(&mut state, promos);
    Ok(state)
}

fn add_item(state: &mut CartState, product: &Product, quantity: u32) {
    if quantity == 0 {
        return;
    }

    if let Some(item) = state
        .line_items
        .iter_mut()
        .find(|item| item.product_id == product.id)
    {
        item.quantity = item.quantity.saturating_add(quantity).min(item.stock_limit);
        return;
    }

    if product.stock == 0 {
        warn!("Product {} has no stock, not added to cart", product.id);
        return;
    }

    state
        .line_items
        .push(CartLineItem::from_product(product, quantity));
}

fn set_quantity(state: &mut CartState, product_id: ProductId, quantity: i64) {
    let Some(index) = state
        .line_items
        .iter()
        .position(|item| item.product_id == product_id)
    else {
        return;
    };

    let clamped = u32::try_from(quantity.max(0))
        .unwrap_or(u32::MAX)
        .min(state.line_items[index].stock_limit);

    if clamped == 0 {
        state.line_items.remove(index);
    } else {
        state.line_items[index].quantity = clamped;
    }
}

/// Recomputes every derived field from the line items.
///
/// An active promo is re-evaluated against the new subtotal. If its code is
/// no longer in the table the last computed discount is kept.
pub fn recalculate(state: &mut CartState, promos: &PromoTable) {
    state.items_count = state
        .line_items
        .iter()
        .fold(0u32, |count, item| count.saturating_add(item.quantity));
    state.subtotal = state.line_items.iter().map(CartLineItem::line_total).sum();

    if let Some(rule) = state.promo_code.as_deref().and_then(|code| promos.lookup(code)) {
        state.discount_amount = rule.discount_for(state.subtotal);
    }

    state.total = (state.subtotal - state.discount_amount).max(0.0);
}

/// Owns the cart state for one session.
pub struct CartStore {
    state: CartState,
    storage: Rc<dyn KeyValueStore>,
    promos: PromoTable,
    key: String,
}

impl CartStore {
    /// Creates the store, hydrating from the snapshot under `key`.
    pub fn new(storage: Rc<dyn KeyValueStore>, promos: PromoTable, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut state: CartState = load_snapshot(storage.as_ref(), &key);

        // Stored data may predate the quantity invariants.
        state.line_items.retain(|item| item.quantity > 0 && item.stock_limit > 0);
        for item in &mut state.line_items {
            item.quantity = item.quantity.min(item.stock_limit);
        }
        recalculate(&mut state, &promos);

        info!(
            "Cart hydrated from '{key}' with {} line item(s)",
            state.line_items.len()
        );

        Self {
            state,
            storage,
            promos,
            key,
        }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn promos(&self) -> &PromoTable {
        &self.promos
    }

    pub fn dispatch(&mut self, action: CartAction) -> Result<&CartState, CartError> {
        self.state = reduce_cart(self.state.clone(), &action, &self.promos)?;

        if matches!(action, CartAction::Clear) {
            erase_snapshot(self.storage.as_ref(), &self.key);
        } else {
            save_snapshot(self.storage.as_ref(), &self.key, &self.state);
        }

        Ok(&self.state)
    }

    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        self.apply(CartAction::AddItem {
            product: product.clone(),
            quantity,
        });
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        self.apply(CartAction::RemoveItem { product_id });
    }

    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        self.apply(CartAction::SetQuantity {
            product_id,
            quantity,
        });
    }

    pub fn clear(&mut self) {
        self.apply(CartAction::Clear);
    }

    pub fn apply_promo(&mut self, code: &str) -> Result<(), CartError> {
        self.dispatch(CartAction::ApplyPromo {
            code: code.to_string(),
        })
        .map(|_| ())
    }

    pub fn remove_promo(&mut self) {
        self.apply(CartAction::RemovePromo);
    }

    /// Dispatches an action that cannot fail.
    fn apply(&mut self, action: CartAction) {
        if let Err(e) = self.dispatch(action) {
            debug!("Cart action rejected: {e}");
        }
    }
}
