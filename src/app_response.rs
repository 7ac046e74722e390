use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::store_error::CartError;

/// Envelope returned across the FFI boundary as JSON.
#[derive(Debug, Serialize, Deserialize)]
pub enum AppResponse {
    SerializationError(String),
    InvalidPromoCode(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            AppResponse::InvalidPromoCode(code) => write!(f, "Invalid promo code: {code}"),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppResponse::Ok(msg) => write!(f, "Ok: {msg}"),
        }
    }
}

impl From<CartError> for AppResponse {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidPromoCode(code) => AppResponse::InvalidPromoCode(code),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::SerializationError(format!("JSON serialization error: {err}"))
    }
}

impl AppResponse {
    /// Serializes `value` into an `Ok` envelope.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::from(e),
        }
    }
}
