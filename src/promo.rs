//! Promo code rules.
//!
//! The table is static and bundled with the crate; codes are matched
//! case-insensitively against their canonical uppercase form.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromoKind {
    /// `value` is a rate in `0.0..=1.0` applied to the subtotal.
    Percentage,
    /// `value` is an amount taken off the subtotal, capped at the subtotal.
    FixedAmount,
    /// Shipping is settled outside the cart; no discount on the subtotal.
    FreeShipping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoRule {
    pub code: String,
    pub kind: PromoKind,
    pub value: f64,
    pub description: String,
}

impl PromoRule {
    fn new(code: &str, kind: PromoKind, value: f64, description: &str) -> Self {
        Self {
            code: code.to_string(),
            kind,
            value,
            description: description.to_string(),
        }
    }

    /// Discount this rule grants against `subtotal`. Never exceeds it.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        let subtotal = subtotal.max(0.0);
        match self.kind {
            PromoKind::Percentage => subtotal * self.value,
            PromoKind::FixedAmount => self.value.min(subtotal),
            PromoKind::FreeShipping => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromoTable {
    rules: Vec<PromoRule>,
}

impl Default for PromoTable {
    fn default() -> Self {
        Self::new(vec![
            PromoRule::new("FLAER10", PromoKind::Percentage, 0.10, "10% off"),
            PromoRule::new("SAVE50", PromoKind::FixedAmount, 50.0, "$50 off"),
            PromoRule::new(
                "WELCOME20",
                PromoKind::Percentage,
                0.20,
                "20% off for new customers",
            ),
            PromoRule::new("FREESHIP", PromoKind::FreeShipping, 0.0, "Free shipping"),
        ])
    }
}

impl PromoTable {
    /// Builds a table; codes are stored uppercase.
    pub fn new(rules: Vec<PromoRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                rule.code = canonical_code(&rule.code);
                rule
            })
            .collect();
        Self { rules }
    }

    pub fn lookup(&self, code: &str) -> Option<&PromoRule> {
        let code = canonical_code(code);
        self.rules.iter().find(|rule| rule.code == code)
    }

    pub fn rules(&self) -> &[PromoRule] {
        &self.rules
    }
}

pub fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}
