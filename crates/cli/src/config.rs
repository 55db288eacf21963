//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPCART_DATA_DIR` - Directory holding the cart slot files (default: .shopcart)
//! - `SHOPCART_CART_KEY` - Slot key for the cart (default: cart)
//! - `SHOPCART_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `RUST_LOG` - Tracing filter (default: info)

use std::path::PathBuf;
use std::str::FromStr;

use shopcart_store::DEFAULT_CART_KEY;
use shopcart_store::storage::validate_key;
use thiserror::Error;

/// Default storage directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".shopcart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    #[error("Invalid flag {0}: {1}")]
    InvalidFlag(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory backing the file storage.
    pub data_dir: PathBuf,
    /// Slot key holding the cart.
    pub cart_key: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("SHOPCART_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let cart_key = lookup("SHOPCART_CART_KEY").unwrap_or(defaults.cart_key);
        validate_key(&cart_key).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPCART_CART_KEY".to_string(), e.to_string())
        })?;

        let log_format = match lookup("SHOPCART_LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPCART_LOG_FORMAT".to_string(), e)
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            data_dir,
            cart_key,
            log_format,
        })
    }

    /// Apply command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFlag` if the `--key` override is not a
    /// valid slot key.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        cart_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        if let Some(cart_key) = cart_key {
            validate_key(&cart_key)
                .map_err(|e| ConfigError::InvalidFlag("--key".to_string(), e.to_string()))?;
            self.cart_key = cart_key;
        }
        Ok(self)
    }
}
