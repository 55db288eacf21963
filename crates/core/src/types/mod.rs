//! Core types for shopcart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod quantity;

pub use cart::{Cart, CartError};
pub use id::ProductId;
pub use line_item::{LineItem, LineItemError};
pub use quantity::{Quantity, QuantityError};
