//! Integration tests for shopcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Store behaviour across reopen over file storage
//! - `cart_properties` - Property tests over random operation sequences
//!
//! Every test gets its own temporary directory through [`TestContext`].

use std::path::{Path, PathBuf};

use serde_json::Value;
use shopcart_core::Cart;
use shopcart_store::{CartStore, FileStorage, Storage, StorageError};
use tempfile::TempDir;

/// A temporary slot directory, removed on drop.
pub struct TestContext {
    dir: TempDir,
    storage: FileStorage,
}

impl TestContext {
    /// Create a fresh, empty storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self, StorageError> {
        let dir = tempfile::tempdir().map_err(|source| StorageError::Io {
            key: "tempdir".to_string(),
            source,
        })?;
        let storage = FileStorage::open(dir.path())?;
        Ok(Self { dir, storage })
    }

    /// The storage directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Handle on the shared file storage.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        self.storage.clone()
    }

    /// Open a new store on the default slot, as a page load would.
    #[must_use]
    pub fn open_store(&self) -> CartStore<FileStorage> {
        CartStore::open(self.storage())
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(format!("{key}.json"))
    }

    /// Raw slot contents, parsed as JSON.
    ///
    /// Returns `None` when the key is absent or not JSON.
    #[must_use]
    pub fn slot_json(&self, key: &str) -> Option<Value> {
        let raw = self.storage.get(key).ok()??;
        serde_json::from_str(&raw).ok()
    }

    /// Overwrite a slot with arbitrary text.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_slot(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        self.storage.set(key, raw)
    }
}

/// `(id, quantity)` pairs in cart order, for compact assertions.
#[must_use]
pub fn summary(cart: &Cart) -> Vec<(String, u32)> {
    cart.items()
        .iter()
        .map(|item| (item.id().to_string(), item.quantity().get()))
        .collect()
}
