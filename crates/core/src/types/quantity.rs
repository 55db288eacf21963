//! Line item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative count.
    #[error("quantity must be at least 1, got {0}")]
    NotPositive(i64),
    /// Larger than a `u32` can hold.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
    },
    /// Not an integer at all.
    #[error("quantity must be an integer")]
    NotAnInteger,
}

/// Count of units requested for one line item.
///
/// ## Constraints
///
/// - At least 1
/// - At most `u32::MAX`
///
/// ## Examples
///
/// ```
/// use shopcart_core::Quantity;
///
/// assert!(Quantity::new(3).is_ok());
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity from a raw count.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] for zero.
    pub const fn new(count: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(count) {
            Some(count) => Ok(Self(count)),
            None => Err(QuantityError::NotPositive(0)),
        }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0.get()) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        if count < 1 {
            return Err(QuantityError::NotPositive(count));
        }
        let count = u32::try_from(count).map_err(|_| QuantityError::TooLarge { max: u32::MAX })?;
        Self::new(count)
    }
}

impl TryFrom<&serde_json::Number> for Quantity {
    type Error = QuantityError;

    fn try_from(number: &serde_json::Number) -> Result<Self, Self::Error> {
        if let Some(count) = number.as_i64() {
            return Self::try_from(count);
        }
        // Positive integers beyond i64 only show up as u64.
        if number.as_u64().is_some() {
            return Err(QuantityError::TooLarge { max: u32::MAX });
        }
        Err(QuantityError::NotAnInteger)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}
