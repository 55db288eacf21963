//! Shopcart CLI - Persisted cart management from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (same id merges quantities)
//! shopcart add '{"id": 1, "quantity": 1, "name": "Pho"}'
//!
//! # Show the cart
//! shopcart show
//!
//! # Remove a product, or empty the cart entirely
//! shopcart remove 1
//! shopcart clear
//!
//! # Use another slot directory or key
//! shopcart --data-dir /tmp/carts --key guest_cart show
//! ```
//!
//! # Commands
//!
//! - `add` - Merge a product into the cart
//! - `remove` - Remove a product
//! - `update` - Set a product's quantity
//! - `clear` - Empty the cart and erase its slot
//! - `show` - Print the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopcart_store::{CartStore, FileStorage};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::cart;
use config::{CliConfig, LogFormat};

#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about = "Persisted shopping cart")]
struct Cli {
    /// Directory holding the cart slot (overrides `SHOPCART_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Slot key for the cart (overrides `SHOPCART_CART_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product given as a JSON object with `id` and `quantity`
    Add {
        /// Product JSON, e.g. '{"id": 1, "quantity": 2, "name": "Pho"}'
        product: String,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: String,

        /// Treat the id as a string even if it looks numeric
        #[arg(long)]
        text: bool,
    },
    /// Set a product's quantity (0 removes it)
    Update {
        /// Product id
        id: String,

        /// New quantity
        quantity: u32,

        /// Treat the id as a string even if it looks numeric
        #[arg(long)]
        text: bool,
    },
    /// Empty the cart and erase its slot
    Clear,
    /// Print the cart
    Show {
        /// Print the raw JSON snapshot
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env()
        .and_then(|config| config.with_overrides(cli.data_dir.clone(), cli.key.clone()))
    {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(cli.command, &config) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&config.data_dir)?;
    let mut store = CartStore::open_with_key(storage, config.cart_key.clone());
    let mut out = std::io::stdout().lock();

    match command {
        Commands::Add { product } => cart::add(&mut store, &product, &mut out)?,
        Commands::Remove { id, text } => {
            cart::remove(&mut store, &cart::parse_product_id(&id, text), &mut out)?;
        }
        Commands::Update { id, quantity, text } => {
            cart::update(
                &mut store,
                &cart::parse_product_id(&id, text),
                quantity,
                &mut out,
            )?;
        }
        Commands::Clear => cart::clear(&mut store, &mut out)?,
        Commands::Show { json } => cart::show(&store, json, &mut out)?,
    }
    Ok(())
}
