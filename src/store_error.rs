//! Error types for the storefront stores.
//!
//! Only two things can go wrong in this crate: a caller submits a promo code
//! that is not in the promo table, or the key-value storage underneath a
//! store fails. The first is returned to the caller; the second is logged by
//! the store layer and otherwise ignored.

use thiserror::Error;

/// Failure reported by a [`KeyValueStore`](crate::persistence::KeyValueStore)
/// implementation or by the JSON codec around it.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lmdb error: {0}")]
    Lmdb(#[from] lmdb::Error),
}

/// Errors surfaced by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The code (after uppercasing) is not present in the promo table.
    #[error("invalid promo code: {0}")]
    InvalidPromoCode(String),
}
