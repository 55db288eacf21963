//! Errors returned by [`CartStore`](crate::CartStore) operations.

use shopcart_core::{CartError, LineItemError};
use thiserror::Error;

use crate::storage::StorageError;

/// Cart store error type.
///
/// Validation errors ([`InvalidItem`](Self::InvalidItem),
/// [`Rejected`](Self::Rejected)) are raised before anything changes.
/// Persistence errors ([`Persist`](Self::Persist),
/// [`Serialize`](Self::Serialize)) are raised after the in-memory cart has
/// already moved on, leaving the durable slot stale.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The product passed to `add_item` is not a valid line item.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] LineItemError),

    /// The cart refused the transition.
    #[error("Rejected: {0}")]
    Rejected(#[from] CartError),

    /// Writing the durable slot failed.
    #[error("Persistence failed: {0}")]
    Persist(#[from] StorageError),

    /// Encoding the snapshot failed.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the in-memory cart changed even though the call failed.
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::Persist(_) | Self::Serialize(_))
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
