//! Shopcart Store - Persisted cart state manager.
//!
//! [`CartStore`] owns the current [`Cart`](shopcart_core::Cart) snapshot and
//! mirrors every change into a single key of a [`Storage`] backend, so a new
//! store opened over the same backend picks up where the last one left off.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use shopcart_store::{CartStore, MemoryStorage};
//!
//! let storage = MemoryStorage::new();
//! let mut store = CartStore::open(&storage);
//!
//! store.add_item(json!({"id": 1, "quantity": 1, "name": "Pho"})).unwrap();
//! store.add_item(json!({"id": 1, "quantity": 2})).unwrap();
//!
//! let reopened = CartStore::open(&storage);
//! assert_eq!(reopened.cart().total_quantity(), 3);
//! ```
//!
//! # Modules
//!
//! - [`storage`] - The `Storage` trait and its memory and file backends
//! - [`store`] - `CartStore` itself
//! - [`error`] - `StoreError`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod storage;
pub mod store;
mod subscription;

pub use error::StoreError;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{CartStore, DEFAULT_CART_KEY};
pub use subscription::SubscriptionId;
