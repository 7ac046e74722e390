//! Product record as served by the remote catalog.

use serde::{Deserialize, Serialize};

pub type ProductId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64,
}

impl Product {
    /// Unit price after the product's own discount, before any promo code.
    pub fn discounted_price(&self) -> f64 {
        discounted(self.price, self.discount_percentage)
    }
}

/// Applies a percentage discount, clamping the percentage to `0..=100`.
pub fn discounted(price: f64, discount_percentage: f64) -> f64 {
    price * (1.0 - clamp_percentage(discount_percentage) / 100.0)
}

pub fn clamp_percentage(discount_percentage: f64) -> f64 {
    if discount_percentage.is_nan() {
        0.0
    } else {
        discount_percentage.clamp(0.0, 100.0)
    }
}
