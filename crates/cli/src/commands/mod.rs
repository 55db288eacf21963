//! CLI subcommand implementations.

pub mod cart;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The product argument is not JSON.
    #[error("Product is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The cart store refused or failed the operation.
    #[error(transparent)]
    Store(#[from] shopcart_store::StoreError),

    /// Writing output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
