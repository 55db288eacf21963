//! The cart: an ordered, id-unique sequence of line items.
//!
//! Every transition here is pure. `with_item`, `without` and
//! `with_updated_quantity` build a new [`Cart`] and leave `self` alone.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::{LineItem, ProductId, Quantity};

/// Errors produced by cart transitions and snapshot validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Merging would push a quantity past `u32::MAX`.
    #[error("quantity overflow for product {0}")]
    QuantityOverflow(ProductId),
    /// Two entries in a snapshot share an id.
    #[error("duplicate product id in cart: {0}")]
    DuplicateId(ProductId),
}

/// An ordered sequence of line items with unique ids.
///
/// Insertion order is preserved. Serializes as a bare JSON array, and
/// deserializing rejects arrays that repeat an id.
///
/// ```
/// use shopcart_core::{Cart, LineItem, Quantity};
///
/// let cart = Cart::new()
///     .with_item(LineItem::new("A", Quantity::new(2).unwrap()))
///     .unwrap()
///     .with_item(LineItem::new("A", Quantity::new(3).unwrap()))
///     .unwrap();
///
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.total_quantity(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the entry for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether a product is in the cart.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Product ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ProductId> {
        self.items.iter().map(LineItem::id)
    }

    /// Sum of all quantities (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }

    /// Sum of line totals over items that carry a readable `price`.
    ///
    /// Items without a price contribute nothing.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .filter_map(LineItem::line_total)
            .fold(Decimal::ZERO, |acc, total| acc.saturating_add(total))
    }

    /// Merge an item into the cart.
    ///
    /// An existing entry with the same id keeps its payload and gains the
    /// incoming quantity; the incoming payload is dropped. A new id is
    /// appended at the end.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the merged quantity does
    /// not fit in a `u32`.
    pub fn with_item(&self, item: LineItem) -> Result<Self, CartError> {
        let mut items = self.items.clone();

        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => {
                let quantity = existing
                    .quantity()
                    .checked_add(item.quantity())
                    .ok_or_else(|| CartError::QuantityOverflow(item.id().clone()))?;
                *existing = existing.with_quantity(quantity);
            }
            None => items.push(item),
        }

        Ok(Self { items })
    }

    /// Drop the entry for a product. Unknown ids leave the cart as it is.
    #[must_use]
    pub fn without(&self, id: &ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// Set an entry's quantity; `0` removes it. Unknown ids are a no-op.
    #[must_use]
    pub fn with_updated_quantity(&self, id: &ProductId, quantity: u32) -> Self {
        let Ok(quantity) = Quantity::new(quantity) else {
            return self.without(id);
        };

        Self {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.id() == id {
                        item.with_quantity(quantity)
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        for (index, item) in items.iter().enumerate() {
            if items.iter().take(index).any(|seen| seen.id() == item.id()) {
                return Err(CartError::DuplicateId(item.id().clone()));
            }
        }
        Ok(Self { items })
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn item(id: impl Into<ProductId>, quantity: u32) -> LineItem {
        LineItem::new(id, Quantity::new(quantity).unwrap())
    }

    fn quantities(cart: &Cart) -> Vec<(String, u32)> {
        cart.items()
            .iter()
            .map(|item| (item.id().to_string(), item.quantity().get()))
            .collect()
    }

    #[test]
    fn test_merge_adds_quantities() {
        let cart = Cart::new()
            .with_item(item("A", 2))
            .unwrap()
            .with_item(item("A", 3))
            .unwrap();

        assert_eq!(quantities(&cart), vec![("A".to_string(), 5)]);
    }

    #[test]
    fn test_merge_keeps_first_payload() {
        let cart = Cart::new()
            .with_item(item(1, 1).with_attribute("name", "Pho"))
            .unwrap()
            .with_item(item(1, 2).with_attribute("name", "Bun Bo"))
            .unwrap();

        let entry = cart.get(&ProductId::from(1)).unwrap();
        assert_eq!(entry.quantity().get(), 3);
        assert_eq!(entry.attribute("name"), Some(&json!("Pho")));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let cart = ["A", "B", "C"]
            .into_iter()
            .try_fold(Cart::new(), |cart, id| cart.with_item(item(id, 1)))
            .unwrap();

        let ids: Vec<String> = cart.ids().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_merge_does_not_move_entry() {
        let cart = Cart::new()
            .with_item(item("A", 1))
            .unwrap()
            .with_item(item("B", 1))
            .unwrap()
            .with_item(item("A", 1))
            .unwrap();

        let ids: Vec<String> = cart.ids().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_int_and_text_ids_do_not_merge() {
        let cart = Cart::new()
            .with_item(item(1, 1))
            .unwrap()
            .with_item(item("1", 1))
            .unwrap();
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_merge_overflow_is_rejected() {
        let cart = Cart::new().with_item(item("A", u32::MAX)).unwrap();
        assert_eq!(
            cart.with_item(item("A", 1)),
            Err(CartError::QuantityOverflow(ProductId::from("A")))
        );
    }

    #[test]
    fn test_with_item_leaves_original_untouched() {
        let before = Cart::new().with_item(item("A", 1)).unwrap();
        let _after = before.with_item(item("A", 4)).unwrap();
        assert_eq!(quantities(&before), vec![("A".to_string(), 1)]);
    }

    #[test]
    fn test_without_missing_id_is_noop() {
        let cart = Cart::new().with_item(item("A", 2)).unwrap();
        assert_eq!(cart.without(&ProductId::from("X")), cart);
    }

    #[test]
    fn test_without_removes_entry() {
        let cart = Cart::new()
            .with_item(item("A", 2))
            .unwrap()
            .with_item(item("B", 1))
            .unwrap();
        let cart = cart.without(&ProductId::from("A"));
        assert_eq!(quantities(&cart), vec![("B".to_string(), 1)]);
    }

    #[test]
    fn test_with_updated_quantity() {
        let cart = Cart::new()
            .with_item(item("A", 2).with_attribute("name", "Pho"))
            .unwrap();

        let updated = cart.with_updated_quantity(&ProductId::from("A"), 7);
        let entry = updated.get(&ProductId::from("A")).unwrap();
        assert_eq!(entry.quantity().get(), 7);
        assert_eq!(entry.attribute("name"), Some(&json!("Pho")));

        assert!(cart.with_updated_quantity(&ProductId::from("A"), 0).is_empty());
        assert_eq!(cart.with_updated_quantity(&ProductId::from("X"), 4), cart);
    }

    #[test]
    fn test_totals() {
        let cart = Cart::new()
            .with_item(item("A", 2).with_attribute("price", "1.25"))
            .unwrap()
            .with_item(item("B", 3).with_attribute("price", 2))
            .unwrap()
            .with_item(item("C", 4))
            .unwrap();

        assert_eq!(cart.total_quantity(), 9);
        assert_eq!(cart.subtotal(), Decimal::new(850, 2));
        assert_eq!(Cart::new().subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::new()
            .with_item(item(1, 3).with_attribute("name", "Pho"))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            json!([{"id": 1, "quantity": 3, "name": "Pho"}])
        );
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let err = serde_json::from_value::<Cart>(json!([
            {"id": "A", "quantity": 1},
            {"id": "A", "quantity": 2}
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("duplicate product id"));
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        assert!(serde_json::from_value::<Cart>(json!([{"id": "A", "quantity": 0}])).is_err());
    }

    fn id_strategy() -> impl Strategy<Value = ProductId> {
        prop_oneof![
            (0_i64..5).prop_map(ProductId::Int),
            "[a-c]".prop_map(ProductId::Text),
        ]
    }

    proptest! {
        #[test]
        fn prop_ids_stay_unique(adds in prop::collection::vec((id_strategy(), 1_u32..50), 0..40)) {
            let mut cart = Cart::new();
            for (id, quantity) in adds {
                cart = cart.with_item(item(id, quantity)).unwrap();
            }

            let ids: Vec<&ProductId> = cart.ids().collect();
            for (index, id) in ids.iter().enumerate() {
                prop_assert!(!ids.iter().take(index).any(|seen| seen == id));
            }
        }

        #[test]
        fn prop_total_is_sum_of_adds(
            adds in prop::collection::vec((id_strategy(), 1_u32..50), 0..40)
        ) {
            let expected: u64 = adds.iter().map(|(_, q)| u64::from(*q)).sum();
            let mut cart = Cart::new();
            for (id, quantity) in adds {
                cart = cart.with_item(item(id, quantity)).unwrap();
            }
            prop_assert_eq!(cart.total_quantity(), expected);
        }

        #[test]
        fn prop_json_round_trip(adds in prop::collection::vec((id_strategy(), 1_u32..50), 0..20)) {
            let mut cart = Cart::new();
            for (id, quantity) in adds {
                cart = cart.with_item(item(id, quantity).with_attribute("name", "x")).unwrap();
            }
            let json = serde_json::to_string(&cart).unwrap();
            let parsed: Cart = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, cart);
        }
    }
}
