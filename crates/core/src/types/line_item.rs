//! Cart line items.
//!
//! A line item is whatever product object the caller handed in, with two
//! fields the cart understands (`id` and `quantity`) and everything else kept
//! as an opaque payload.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ProductId, Quantity, QuantityError};

/// Name of the merge-key field.
pub const ID_FIELD: &str = "id";

/// Name of the unit count field.
pub const QUANTITY_FIELD: &str = "quantity";

/// Name of the payload attribute read for subtotals.
pub const PRICE_FIELD: &str = "price";

/// Errors that can occur when validating a raw product into a [`LineItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineItemError {
    /// The product is not a JSON object.
    #[error("product must be an object")]
    NotAnObject,
    /// No `id` field, or `id` is null.
    #[error("product is missing an id")]
    MissingId,
    /// `id` is neither a string nor an integer.
    #[error("product id must be a string or an integer")]
    InvalidId,
    /// No `quantity` field, or `quantity` is null.
    #[error("product is missing a quantity")]
    MissingQuantity,
    /// `quantity` is not a positive integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),
}

/// One distinct product within the cart.
///
/// Serializes as a flat object: `id`, `quantity`, then the payload fields.
///
/// ```
/// use serde_json::json;
/// use shopcart_core::LineItem;
///
/// let item = LineItem::try_from(json!({"id": 1, "quantity": 2, "name": "Pho"})).unwrap();
/// assert_eq!(item.quantity().get(), 2);
/// assert_eq!(item.attribute("name"), Some(&json!("Pho")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    id: ProductId,
    quantity: Quantity,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl LineItem {
    /// Create a line item with no payload.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, quantity: Quantity) -> Self {
        Self {
            id: id.into(),
            quantity,
            attributes: Map::new(),
        }
    }

    /// Attach a payload attribute.
    ///
    /// `id` and `quantity` are reserved and ignored here.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != ID_FIELD && key != QUANTITY_FIELD {
            self.attributes.insert(key, value.into());
        }
        self
    }

    /// Validate a raw product object.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, if `id` is missing or
    /// not a string/integer, or if `quantity` is missing or not a positive
    /// integer that fits in a `u32`.
    pub fn from_value(value: Value) -> Result<Self, LineItemError> {
        let Value::Object(mut attributes) = value else {
            return Err(LineItemError::NotAnObject);
        };

        let id = match attributes.remove(ID_FIELD) {
            None | Some(Value::Null) => return Err(LineItemError::MissingId),
            Some(Value::String(id)) => ProductId::Text(id),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(ProductId::Int)
                .ok_or(LineItemError::InvalidId)?,
            Some(_) => return Err(LineItemError::InvalidId),
        };

        let quantity = match attributes.remove(QUANTITY_FIELD) {
            None | Some(Value::Null) => return Err(LineItemError::MissingQuantity),
            Some(Value::Number(n)) => Quantity::try_from(&n)?,
            Some(_) => return Err(QuantityError::NotAnInteger.into()),
        };

        Ok(Self {
            id,
            quantity,
            attributes,
        })
    }

    /// The merge key.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Units requested.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Copy of this item with a different quantity and the same payload.
    #[must_use]
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Opaque payload fields.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Look up one payload field.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Unit price read from the `price` attribute.
    ///
    /// Accepts a JSON number or a numeric string. Returns `None` when the
    /// attribute is absent or unreadable.
    #[must_use]
    pub fn unit_price(&self) -> Option<Decimal> {
        match self.attributes.get(PRICE_FIELD)? {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    /// `unit_price × quantity`, when a unit price is known.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price()?
            .checked_mul(Decimal::from(self.quantity.get()))
    }
}

impl TryFrom<Value> for LineItem {
    type Error = LineItemError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<LineItem> for Value {
    fn from(item: LineItem) -> Self {
        let mut object = Map::with_capacity(item.attributes.len() + 2);
        let id = match item.id {
            ProductId::Int(id) => Self::from(id),
            ProductId::Text(id) => Self::String(id),
        };
        object.insert(ID_FIELD.to_owned(), id);
        object.insert(QUANTITY_FIELD.to_owned(), Self::from(item.quantity.get()));
        object.extend(item.attributes);
        Self::Object(object)
    }
}
