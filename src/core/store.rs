//! Persisted key-value helper.
//!
//! Values are stored as JSON text under caller-chosen keys. Reads are total:
//! a missing key, an unreadable backend, or malformed/stale JSON all come back
//! as `None`, so pages never need defensive parsing. Writes are not absorbed;
//! serialization and quota failures reach the caller.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::core::error::StoreError;
use crate::utils::dom;

// =============================================================================
// Backends
// =============================================================================

/// Raw string storage the [`Store`] serializes into.
pub trait StorageBackend {
    /// Raw value under `key`. Backend read failures are reported as `None`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Absent keys are not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Browser `localStorage`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's localStorage.
    pub fn open() -> Result<Self, StoreError> {
        let storage = dom::local_storage().ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write(dom::js_error_message(&e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Remove(dom::js_error_message(&e)))
    }
}

/// In-process map; used off-browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw text under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.items.borrow_mut().insert(key.to_string(), raw.to_string());
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// =============================================================================
// Store
// =============================================================================

/// JSON key-value store over a [`StorageBackend`].
#[derive(Debug)]
pub struct Store<B> {
    backend: B,
}

impl Store<LocalStorage> {
    /// Store backed by the window's localStorage.
    pub fn local() -> Result<Self, StoreError> {
        Ok(Self::new(LocalStorage::open()?))
    }
}

impl<B: StorageBackend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `None` if the key doesn't exist or deserialization fails.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring unreadable stored value for {key:?}: {e}");
                None
            }
        }
    }

    /// Serialize `value` and store it under `key`, overwriting unconditionally.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.backend.set_item(key, &json)
    }

    /// Delete the value under `key`; no-op if absent.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove_item(key)
    }
}
