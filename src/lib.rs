//! # Storefront Core
//!
//! Client-side state for a product storefront: shopping cart with promo
//! codes, catalog filters with infinite-scroll pagination, and a wishlist.
//! Designed for FFI integration with cross-platform UI shells; every
//! mutation is a JSON action and every answer a JSON envelope.
//!
//! ## Features
//!
//! - **Pure reducers**: each store is a `(state, action) -> state` function,
//!   testable without any UI
//! - **Reconciled totals**: cart subtotal, promo discount and total are
//!   recomputed from the line items after every change
//! - **Offline persistence**: cart and wishlist snapshots are written to an
//!   injected key-value store (LMDB-backed or in-memory) after every change
//! - **Safe error handling**: storage failures are logged, never surfaced;
//!   no `unwrap()` calls in production code
//!
//! ## Quick Start
//!
//! ```no_run
//! use storefront_core::{create_storefront, cart_dispatch};
//! use std::ffi::CString;
//!
//! let config = CString::new(r#"{"storagePath":"my_shop"}"#).unwrap();
//! let storefront = create_storefront(config.as_ptr());
//!
//! let action = CString::new(
//!     r#"{"type":"addItem","product":{"id":1,"title":"Lamp","price":80.0,"stock":5},"quantity":2}"#,
//! ).unwrap();
//! let cart_json = cart_dispatch(storefront, action.as_ptr());
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_storefront`] - Open storage and hydrate all stores
//! - [`cart_dispatch`] / [`get_cart`] - Cart actions and snapshot
//! - [`filters_dispatch`] / [`get_filters`] - Filter actions and snapshot
//! - [`wishlist_dispatch`] / [`get_wishlist`] - Wishlist commands and snapshot
//! - [`catalog_query`] - Request for the current catalog page
//! - [`catalog_categories_query`] / [`catalog_product_query`] - Requests for
//!   the category list and a product's detail page
//! - [`receive_catalog_page`] - Feed a fetched page into the result list
//! - [`free_response`] - Release a string returned by any function above
//! - [`destroy_storefront`] - Release the storefront

pub mod app_response;
pub mod cart_model;
pub mod cart_store;
pub mod catalog_query;
pub mod config;
pub mod filter_state;
pub mod lmdb_store;
pub mod persistence;
pub mod product;
pub mod promo;
pub mod store_error;
pub mod storefront;
pub mod wishlist_store;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app_response::AppResponse;
use crate::cart_store::CartAction;
use crate::catalog_query::{CatalogPage, CatalogQuery};
use crate::config::StorefrontConfig;
use crate::filter_state::FilterAction;
use crate::storefront::{Storefront, WishlistCommand};

/// Creates a storefront from a JSON configuration.
///
/// # Parameters
///
/// * `config_json` - Null-terminated JSON [`StorefrontConfig`]; a null
///   pointer selects the default in-memory configuration
///
/// # Returns
///
/// A pointer to the [`Storefront`], or null when the configuration is not
/// valid JSON or the storage cannot be opened. Release it with
/// [`destroy_storefront`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use storefront_core::create_storefront;
///
/// let config = CString::new(r#"{"storagePath":"shop","pageSize":30}"#).unwrap();
/// let storefront = create_storefront(config.as_ptr());
/// assert!(!storefront.is_null());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_storefront(config_json: *const c_char) -> *mut Storefront {
    let config = if config_json.is_null() {
        StorefrontConfig::default()
    } else {
        let raw = match unsafe { CStr::from_ptr(config_json).to_str() } {
            Ok(s) => s,
            Err(e) => {
                warn!("Invalid UTF-8 in storefront config: {e}");
                return std::ptr::null_mut();
            }
        };
        match StorefrontConfig::from_json(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid storefront config: {e}");
                return std::ptr::null_mut();
            }
        }
    };

    match Storefront::open(config) {
        Ok(storefront) => {
            info!("Storefront initialized");
            Box::into_raw(Box::new(storefront))
        }
        Err(e) => {
            warn!("Failed to open storefront storage: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Applies a cart action and returns the resulting cart.
///
/// # JSON Format
///
/// ```json
/// {"type": "addItem", "product": {"id": 1, "title": "Lamp", "price": 80.0, "stock": 5}, "quantity": 1}
/// {"type": "removeItem", "productId": 1}
/// {"type": "setQuantity", "productId": 1, "quantity": 3}
/// {"type": "applyPromo", "code": "save50"}
/// {"type": "removePromo"}
/// {"type": "clear"}
/// ```
///
/// An unknown promo code answers `InvalidPromoCode` and leaves the cart as
/// it was.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn cart_dispatch(state: *mut Storefront, action_json: *const c_char) -> *const c_char {
    let storefront = match unsafe { state.as_mut() } {
        Some(s) => s,
        None => return null_state("cart_dispatch"),
    };

    let action: CartAction = match parse_json(action_json, "action") {
        Ok(action) => action,
        Err(err) => return err,
    };

    match storefront.cart.dispatch(action) {
        Ok(cart) => json_response(cart),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Returns the current cart, derived totals included.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_cart(state: *mut Storefront) -> *const c_char {
    match unsafe { state.as_ref() } {
        Some(storefront) => json_response(storefront.cart.state()),
        None => null_state("get_cart"),
    }
}

/// Applies a filter action and returns the resulting filter state.
///
/// ```json
/// {"type": "setCategory", "category": "smartphones"}
/// {"type": "setPriceRange", "min": 10.0, "max": 250.0}
/// {"type": "setCurrentPage", "page": 3}
/// {"type": "clearFilters"}
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn filters_dispatch(state: *mut Storefront, action_json: *const c_char) -> *const c_char {
    let storefront = match unsafe { state.as_mut() } {
        Some(s) => s,
        None => return null_state("filters_dispatch"),
    };

    let action: FilterAction = match parse_json(action_json, "action") {
        Ok(action) => action,
        Err(err) => return err,
    };

    json_response(storefront.dispatch_filters(action))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_filters(state: *mut Storefront) -> *const c_char {
    match unsafe { state.as_ref() } {
        Some(storefront) => json_response(storefront.filters.state()),
        None => null_state("get_filters"),
    }
}

/// Applies a wishlist command (`add` with a product, `remove` with a
/// `productId`, or `clear`) and returns the wishlist entries.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn wishlist_dispatch(state: *mut Storefront, command_json: *const c_char) -> *const c_char {
    let storefront = match unsafe { state.as_mut() } {
        Some(s) => s,
        None => return null_state("wishlist_dispatch"),
    };

    let command: WishlistCommand = match parse_json(command_json, "command") {
        Ok(command) => command,
        Err(err) => return err,
    };

    storefront.dispatch_wishlist(command);
    json_response(storefront.wishlist.state())
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_wishlist(state: *mut Storefront) -> *const c_char {
    match unsafe { state.as_ref() } {
        Some(storefront) => json_response(storefront.wishlist.state()),
        None => null_state("get_wishlist"),
    }
}

/// Returns the catalog request (`path` and `params`) for the current filters.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_query(state: *mut Storefront) -> *const c_char {
    match unsafe { state.as_ref() } {
        Some(storefront) => json_response(&storefront.catalog_query()),
        None => null_state("catalog_query"),
    }
}

/// Returns the catalog request for the category list.
#[no_mangle]
pub extern "C" fn catalog_categories_query() -> *const c_char {
    json_response(&CatalogQuery::categories())
}

/// Returns the catalog request for one product's detail page.
#[no_mangle]
pub extern "C" fn catalog_product_query(product_id: u64) -> *const c_char {
    json_response(&CatalogQuery::product(product_id))
}

/// Feeds a fetched catalog page (`{"products": [...], "total": n, ...}`)
/// into the accumulated result list and returns that list.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn receive_catalog_page(state: *mut Storefront, page_json: *const c_char) -> *const c_char {
    let storefront = match unsafe { state.as_mut() } {
        Some(s) => s,
        None => return null_state("receive_catalog_page"),
    };

    let page: CatalogPage = match parse_json(page_json, "page") {
        Ok(page) => page,
        Err(err) => return err,
    };

    json_response(storefront.receive_page(page))
}

/// Releases a string returned by any function of this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(ptr as *mut c_char));
    }
}

/// Releases a storefront created by [`create_storefront`].
///
/// Snapshots are already persisted after every mutation, so nothing is
/// written here.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn destroy_storefront(state: *mut Storefront) {
    if state.is_null() {
        warn!("Null state pointer passed to destroy_storefront");
        return;
    }
    unsafe {
        drop(Box::from_raw(state));
    }
}

fn null_state(function: &str) -> *const c_char {
    let error = AppResponse::BadRequest(format!("Null state pointer passed to {function}"));
    response_to_c_string(&error)
}

fn json_response<T: Serialize>(value: &T) -> *const c_char {
    response_to_c_string(&AppResponse::json(value))
}

/// Decodes a JSON C string, or returns the error envelope to hand back.
fn parse_json<T: DeserializeOwned>(ptr: *const c_char, field_name: &str) -> Result<T, *const c_char> {
    let raw = c_ptr_to_string(ptr, field_name)?;
    serde_json::from_str(&raw).map_err(|e| {
        let error = AppResponse::SerializationError(format!("Invalid {field_name} JSON: {e}"));
        response_to_c_string(&error)
    })
}

/// Converts an [`AppResponse`] to a C string owned by the caller.
///
/// Returns null if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust String, handling null pointers and
/// invalid UTF-8.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
