//! Product identifiers.
//!
//! Product listings hand the cart either numeric or textual ids, so
//! [`ProductId`] keeps whichever form it was given. The two forms never compare
//! equal: `1` and `"1"` are different products.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a product in the cart, used as the merge key.
///
/// Serializes untagged, so it round-trips as a bare JSON number or string.
///
/// # Example
///
/// ```rust
/// # use shopcart_core::ProductId;
/// let numeric = ProductId::from(1);
/// let textual = ProductId::from("1");
///
/// assert_ne!(numeric, textual);
/// assert_eq!(numeric.to_string(), textual.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Integer id.
    Int(i64),
    /// String id.
    Text(String),
}

impl ProductId {
    /// Get the integer value, if this is an integer id.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Text(_) => None,
        }
    }

    /// Get the string value, if this is a string id.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Text(id) => Some(id),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => fmt::Display::fmt(id, f),
            Self::Text(id) => f.pad(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}
