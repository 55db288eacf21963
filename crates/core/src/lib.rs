//! Shopcart Core - Cart data model.
//!
//! This crate provides the types shared by every shopcart component:
//! - `store` - Persisted cart state manager
//! - `cli` - Command-line front end over a file-backed slot
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transitions - no I/O and
//! no persistence. Every mutation of a [`Cart`] returns a new snapshot and
//! leaves the original untouched, which is what lets the store hand out
//! shared immutable snapshots.
//!
//! # Modules
//!
//! - [`types`] - Product ids, quantities, line items and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
