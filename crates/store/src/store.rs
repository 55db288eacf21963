//! The cart store: in-memory snapshot plus a durable mirror.
//!
//! Every mutation builds a new [`Cart`], swaps it in as the current snapshot,
//! writes it to the slot and then notifies subscribers. An empty cart is
//! never written; its slot key is removed instead, so an absent key and an
//! empty cart mean the same thing.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use shopcart_core::{Cart, LineItem, ProductId};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::storage::Storage;
use crate::subscription::{Subscribers, SubscriptionId};

/// Default slot key for the cart snapshot.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Cart state manager over a [`Storage`] slot.
///
/// Operations take `&mut self` and complete synchronously. Two stores over
/// the same storage each keep their own snapshot; whichever writes last owns
/// the slot.
pub struct CartStore<S: Storage> {
    storage: S,
    key: String,
    cart: Arc<Cart>,
    subscribers: Subscribers,
}

impl<S: Storage> CartStore<S> {
    /// Open a store on the default `"cart"` slot.
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, DEFAULT_CART_KEY)
    }

    /// Open a store on a named slot, adopting whatever snapshot it holds.
    ///
    /// Unreadable or malformed snapshots are logged and replaced by an empty
    /// cart in memory. The slot itself is left alone until the next write.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = load(&storage, &key);
        debug!(key = %key, items = cart.len(), "Cart store opened");

        Self {
            storage,
            key,
            cart: Arc::new(cart),
            subscribers: Subscribers::default(),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(&self.cart)
    }

    /// Slot key this store persists to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate a raw product and merge it into the cart.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidItem`](crate::StoreError::InvalidItem) if the
    ///   product lacks an `id` or a positive integer `quantity`; nothing changes.
    /// - [`StoreError::Rejected`](crate::StoreError::Rejected) if the merged
    ///   quantity overflows; nothing changes.
    /// - [`StoreError::Persist`](crate::StoreError::Persist) if the slot write
    ///   fails; the in-memory cart has already been updated.
    #[instrument(skip(self, product), fields(key = %self.key))]
    pub fn add_item(&mut self, product: Value) -> Result<Arc<Cart>> {
        let item = LineItem::from_value(product).inspect_err(|e| {
            debug!(error = %e, "Rejected product");
        })?;
        self.add_line_item(item)
    }

    /// Merge an already validated line item into the cart.
    ///
    /// Same-id entries gain the quantity and keep their own payload;
    /// new ids are appended.
    ///
    /// # Errors
    ///
    /// See [`add_item`](Self::add_item).
    #[instrument(
        skip(self, item),
        fields(key = %self.key, id = %item.id(), quantity = %item.quantity())
    )]
    pub fn add_line_item(&mut self, item: LineItem) -> Result<Arc<Cart>> {
        let next = self.cart.with_item(item)?;
        self.commit(next)
    }

    /// Remove a product. Unknown ids leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`](crate::StoreError::Persist) if the slot
    /// write fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn remove_item(&mut self, id: &ProductId) -> Result<Arc<Cart>> {
        let next = self.cart.without(id);
        self.commit(next)
    }

    /// Set a product's quantity; `0` removes it. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`](crate::StoreError::Persist) if the slot
    /// write fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> Result<Arc<Cart>> {
        let next = self.cart.with_updated_quantity(id, quantity);
        self.commit(next)
    }

    /// Empty the cart and erase its slot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`](crate::StoreError::Persist) if the key
    /// cannot be removed; memory is empty regardless.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn clear(&mut self) -> Result<()> {
        self.commit(Cart::new()).map(drop)
    }

    /// Re-read the slot and adopt its snapshot.
    ///
    /// Picks up writes made by another store over the same storage.
    /// Subscribers are notified only if the snapshot differs.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn reload(&mut self) -> Arc<Cart> {
        let next = load(&self.storage, &self.key);
        if *self.cart != next {
            self.cart = Arc::new(next);
            self.subscribers.notify(&self.cart);
        }
        self.cart()
    }

    /// Register a listener called with every new snapshot.
    ///
    /// Listeners run synchronously, after the slot write, in subscription
    /// order. They do not run for calls that leave the cart unchanged.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&Arc<Cart>) + Send + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    /// Drop a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn commit(&mut self, next: Cart) -> Result<Arc<Cart>> {
        let changed = *self.cart != next;
        self.cart = Arc::new(next);

        let persisted = self.persist();
        if let Err(e) = &persisted {
            warn!(key = %self.key, error = %e, "Cart slot is stale");
        }

        if changed {
            debug!(
                items = self.cart.len(),
                total_quantity = self.cart.total_quantity(),
                "Cart updated"
            );
            self.subscribers.notify(&self.cart);
        }

        persisted.map(|()| self.cart())
    }

    fn persist(&self) -> Result<()> {
        if self.cart.is_empty() {
            self.storage.remove(&self.key)?;
        } else {
            let snapshot = serde_json::to_string(self.cart.as_ref())?;
            self.storage.set(&self.key, &snapshot)?;
        }
        Ok(())
    }
}

impl<S: Storage + fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("cart", &self.cart)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Read a snapshot from the slot, falling back to an empty cart.
fn load<S: Storage>(storage: &S, key: &str) -> Cart {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read cart slot, starting empty");
            return Cart::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key = %key, error = %e, "Discarding malformed cart snapshot");
        Cart::new()
    })
}
