//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (merged by id)
//! shopcart add '{"id": 1, "quantity": 1, "name": "Pho", "price": 45000}'
//!
//! # Change or drop a line
//! shopcart update 1 3
//! shopcart remove 1
//!
//! # String ids that look numeric
//! shopcart remove 42 --text
//!
//! # Inspect and reset
//! shopcart show
//! shopcart show --json
//! shopcart clear
//! ```

use std::io::Write;

use serde_json::Value;
use shopcart_core::{Cart, ProductId};
use shopcart_store::{CartStore, Storage, StoreError};
use tracing::info;

use super::CommandError;

/// Parse a command-line product id.
///
/// Integers become integer ids unless `text` is set.
#[must_use]
pub fn parse_product_id(raw: &str, text: bool) -> ProductId {
    match (text, raw.parse::<i64>()) {
        (false, Ok(id)) => ProductId::Int(id),
        _ => ProductId::from(raw),
    }
}

/// Add a product given as a JSON object.
///
/// # Errors
///
/// Returns an error if the argument is not JSON or the store rejects it.
/// A failed slot write is reported after the cart has been printed.
pub fn add<S: Storage>(
    store: &mut CartStore<S>,
    product: &str,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let product: Value = serde_json::from_str(product)?;
    let result = store.add_item(product);
    finish(store, result, "Added item", out)
}

/// Remove a product.
///
/// # Errors
///
/// Returns an error if the slot write fails.
pub fn remove<S: Storage>(
    store: &mut CartStore<S>,
    id: &ProductId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if !store.cart().contains(id) {
        info!(id = %id, "Product not in cart");
    }
    let result = store.remove_item(id);
    finish(store, result, "Removed item", out)
}

/// Set a product's quantity; `0` removes it.
///
/// # Errors
///
/// Returns an error if the slot write fails.
pub fn update<S: Storage>(
    store: &mut CartStore<S>,
    id: &ProductId,
    quantity: u32,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let result = store.update_quantity(id, quantity);
    finish(store, result, "Updated quantity", out)
}

/// Empty the cart and erase its slot.
///
/// # Errors
///
/// Returns an error if the slot cannot be erased.
pub fn clear<S: Storage>(
    store: &mut CartStore<S>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    store.clear()?;
    info!(key = store.key(), "Cart cleared");
    writeln!(out, "Cart cleared")?;
    Ok(())
}

/// Print the cart, as a table or as the raw JSON snapshot.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn show<S: Storage>(
    store: &CartStore<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let cart = store.cart();
    if json {
        serde_json::to_writer_pretty(&mut *out, cart.as_ref()).map_err(std::io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }
    render(&cart, out)
}

/// Print the cart after a mutation, then surface any error.
///
/// Validation errors leave the cart untouched and print nothing. Persistence
/// errors still print, because memory has moved on.
fn finish<S: Storage>(
    store: &CartStore<S>,
    result: Result<std::sync::Arc<Cart>, StoreError>,
    action: &str,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match result {
        Ok(cart) => {
            info!(key = store.key(), items = cart.len(), "{action}");
            render(&cart, out)
        }
        Err(e) if e.is_persistence() => {
            render(&store.cart(), out)?;
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn render(cart: &Cart, out: &mut impl Write) -> Result<(), CommandError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    writeln!(
        out,
        "Cart ({} items, {} units)",
        cart.len(),
        cart.total_quantity()
    )?;
    for item in cart {
        let name = item
            .attribute("name")
            .and_then(Value::as_str)
            .unwrap_or("-");
        match item.line_total() {
            Some(total) => writeln!(
                out,
                "  {:<12} x{:<5} {:<24} {}",
                item.id(),
                item.quantity(),
                name,
                total
            )?,
            None => writeln!(out, "  {:<12} x{:<5} {}", item.id(), item.quantity(), name)?,
        }
    }
    writeln!(out, "Subtotal: {}", cart.subtotal())?;
    Ok(())
}
