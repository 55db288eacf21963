//! Key-value persistence behind the cart slot.
//!
//! The store never touches a concrete backend directly. It talks to a
//! [`Storage`], which maps string keys to string values the way browser local
//! storage does:
//!
//! - [`MemoryStorage`] - in-process map, optionally with a byte quota
//! - [`FileStorage`] - one JSON file per key in a directory

mod file;
mod memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Longest key accepted by [`validate_key`].
pub const MAX_KEY_LENGTH: usize = 128;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on key {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The write would exceed the backend's quota.
    #[error("Storage quota exceeded writing {key}: {required} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the backend would hold after the write.
        required: usize,
        /// Configured limit.
        quota: usize,
    },

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key {0:?}: use 1-128 ASCII letters, digits, '-' or '_'")]
    InvalidKey(String),
}

/// String-keyed, string-valued persistence.
///
/// Implementations must be shareable: two stores opened over the same backend
/// see each other's writes (last writer wins).
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read. A missing key is
    /// `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or fails the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails. Removing a missing key is `Ok`.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Check that a key is safe to use as a file name.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] unless the key is 1-128 characters of
/// ASCII letters, digits, `-` or `_`.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}
