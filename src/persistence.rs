//! Key-value persistence capability used by the stores.
//!
//! Each store writes one JSON document under a fixed key after every
//! mutation and reads it back exactly once, when the store is created.
//! Storage failures never reach the caller: [`load_snapshot`] falls back to
//! the default value and [`save_snapshot`] / [`erase_snapshot`] log and
//! move on.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store_error::PersistenceError;

/// String-keyed storage of string values, in the shape of browser local
/// storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// In-process storage. Contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reads and decodes the document stored under `key`.
///
/// Missing, unreadable or unparseable data all yield `T::default()`.
pub fn load_snapshot<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No snapshot stored under '{key}', starting empty");
            return T::default();
        }
        Err(e) => {
            warn!("Could not read snapshot '{key}': {e}");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!("Hydrated snapshot '{key}'");
            value
        }
        Err(e) => {
            warn!("Discarding unparseable snapshot '{key}': {e}");
            T::default()
        }
    }
}

/// Encodes `value` and writes it under `key`. Failures are logged only.
pub fn save_snapshot<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(PersistenceError::from)
        .and_then(|json| store.set(key, &json));

    if let Err(e) = result {
        warn!("Could not persist snapshot '{key}': {e}");
    }
}

/// Deletes the document under `key`. Failures are logged only.
pub fn erase_snapshot(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!("Could not erase snapshot '{key}': {e}");
    }
}
