//! Cart data model.
//!
//! [`CartState`] is the document persisted under the cart key. Its derived
//! fields (`itemsCount`, `subtotal`, `discountAmount`, `total`) are stored
//! alongside the line items for readers of the raw snapshot, but they are
//! always recomputed from the line items and never set directly.

use serde::{Deserialize, Serialize};

use crate::product::{clamp_percentage, discounted, Product, ProductId};

/// One product entry in the cart.
///
/// Price, discount and stock are captured when the product is first added
/// and are not linked to later catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: f64,
    pub discount_percentage: f64,
    pub thumbnail: String,
    pub category: String,
    /// Always in `1..=stock_limit`.
    pub quantity: u32,
    pub stock_limit: u32,
}

impl CartLineItem {
    pub(crate) fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            discount_percentage: clamp_percentage(product.discount_percentage),
            thumbnail: product.thumbnail.clone(),
            category: product.category.clone(),
            quantity: quantity.min(product.stock),
            stock_limit: product.stock,
        }
    }

    pub fn discounted_unit_price(&self) -> f64 {
        discounted(self.unit_price, self.discount_percentage)
    }

    pub fn line_total(&self) -> f64 {
        self.discounted_unit_price() * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartState {
    pub(crate) line_items: Vec<CartLineItem>,
    pub(crate) promo_code: Option<String>,
    pub(crate) items_count: u32,
    pub(crate) subtotal: f64,
    pub(crate) discount_amount: f64,
    pub(crate) total: f64,
}

impl CartState {
    /// Line items in insertion order.
    pub fn line_items(&self) -> &[CartLineItem] {
        &self.line_items
    }

    pub fn line_item(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.line_items
            .iter()
            .find(|item| item.product_id == product_id)
    }

    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Sum of quantities over all line items.
    pub fn items_count(&self) -> u32 {
        self.items_count
    }

    /// Sum of discounted line totals, before the promo discount.
    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }

    pub fn discount_amount(&self) -> f64 {
        self.discount_amount
    }

    /// `max(0, subtotal - discount_amount)`.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}
