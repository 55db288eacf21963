//! Integration tests for cart persistence over file storage.
//!
//! Each test opens stores over a temporary directory and reopens them to
//! simulate page reloads.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use shopcart_core::ProductId;
use shopcart_integration_tests::{TestContext, summary};
use shopcart_store::{CartStore, StoreError};

fn ctx() -> TestContext {
    TestContext::new().expect("Failed to create test context")
}

// ============================================================================
// Merge and Order
// ============================================================================

#[test]
fn test_merge_same_id() {
    let ctx = ctx();
    let mut store = ctx.open_store();

    store.add_item(json!({"id": "A", "quantity": 2})).unwrap();
    store.add_item(json!({"id": "A", "quantity": 3})).unwrap();

    assert_eq!(summary(&store.cart()), vec![("A".to_string(), 5)]);
    assert_eq!(ctx.slot_json("cart"), Some(json!([{"id": "A", "quantity": 5}])));
}

#[test]
fn test_insertion_order() {
    let ctx = ctx();
    let mut store = ctx.open_store();

    for id in ["A", "B", "C"] {
        store.add_item(json!({"id": id, "quantity": 1})).unwrap();
    }

    let ids: Vec<String> = store.cart().ids().map(ToString::to_string).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

// ============================================================================
// Reload
// ============================================================================

#[test]
fn test_reopen_reproduces_cart() {
    let ctx = ctx();
    let mut store = ctx.open_store();

    store
        .add_item(json!({"id": 7, "quantity": 1, "name": "Banh Mi", "price": "3.25"}))
        .unwrap();
    store.add_item(json!({"id": "sku-9", "quantity": 4})).unwrap();
    store.add_item(json!({"id": 7, "quantity": 1})).unwrap();
    store.remove_item(&ProductId::from("missing")).unwrap();

    let reopened = ctx.open_store();
    assert_eq!(*reopened.cart(), *store.cart());
    assert_eq!(
        summary(&reopened.cart()),
        vec![("7".to_string(), 2), ("sku-9".to_string(), 4)]
    );
    assert_eq!(
        reopened
            .cart()
            .get(&ProductId::from(7))
            .unwrap()
            .attribute("name"),
        Some(&json!("Banh Mi"))
    );
}

#[test]
fn test_remove_missing_id_leaves_cart_unchanged() {
    let ctx = ctx();
    let mut store = ctx.open_store();
    store.add_item(json!({"id": "A", "quantity": 2})).unwrap();
    let before = ctx.slot_json("cart");

    store.remove_item(&ProductId::from("X")).unwrap();

    assert_eq!(summary(&store.cart()), vec![("A".to_string(), 2)]);
    assert_eq!(ctx.slot_json("cart"), before);
}

#[test]
fn test_malformed_slot_falls_back_to_empty() {
    let ctx = ctx();
    ctx.write_slot("cart", "{ definitely not a cart").unwrap();

    let mut store = ctx.open_store();
    assert!(store.cart().is_empty());

    // The next write replaces the corrupt snapshot.
    store.add_item(json!({"id": 1, "quantity": 1})).unwrap();
    assert_eq!(ctx.slot_json("cart"), Some(json!([{"id": 1, "quantity": 1}])));
}

// ============================================================================
// Clear
// ============================================================================

#[test]
fn test_clear_erases_slot_file() {
    let ctx = ctx();
    let mut store = ctx.open_store();
    store.add_item(json!({"id": "A", "quantity": 1})).unwrap();
    assert!(ctx.slot_path("cart").is_file());

    store.clear().unwrap();

    assert!(!ctx.slot_path("cart").exists());
    assert!(ctx.open_store().cart().is_empty());
}

#[test]
fn test_scenario_pho() {
    let ctx = ctx();
    let mut store = ctx.open_store();
    assert!(store.cart().is_empty());

    let cart = store
        .add_item(json!({"id": 1, "quantity": 1, "name": "Pho"}))
        .unwrap();
    assert_eq!(
        serde_json::to_value(&*cart).unwrap(),
        json!([{"id": 1, "quantity": 1, "name": "Pho"}])
    );

    let cart = store.add_item(json!({"id": 1, "quantity": 2})).unwrap();
    assert_eq!(
        serde_json::to_value(&*cart).unwrap(),
        json!([{"id": 1, "quantity": 3, "name": "Pho"}])
    );

    let cart = store.remove_item(&ProductId::from(1)).unwrap();
    assert!(cart.is_empty());
    assert!(!ctx.slot_path("cart").exists());
    assert_eq!(ctx.slot_json("cart"), None);
}

// ============================================================================
// Errors and Shared Slots
// ============================================================================

#[test]
fn test_invalid_input_leaves_slot_alone() {
    let ctx = ctx();
    let mut store = ctx.open_store();
    store.add_item(json!({"id": "A", "quantity": 1})).unwrap();

    let err = store
        .add_item(json!({"id": "B", "quantity": -4}))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidItem(_)));
    assert_eq!(ctx.slot_json("cart"), Some(json!([{"id": "A", "quantity": 1}])));
}

#[test]
fn test_two_stores_last_writer_wins() {
    let ctx = ctx();
    let mut tab_one = ctx.open_store();
    let mut tab_two = ctx.open_store();

    tab_one.add_item(json!({"id": "A", "quantity": 1})).unwrap();
    tab_two.add_item(json!({"id": "B", "quantity": 1})).unwrap();

    assert_eq!(summary(&ctx.open_store().cart()), vec![("B".to_string(), 1)]);

    // An explicit reload adopts the other tab's write.
    let cart = tab_one.reload();
    assert_eq!(summary(&cart), vec![("B".to_string(), 1)]);
}

#[test]
fn test_separate_keys_are_independent() {
    let ctx = ctx();
    let mut guest = CartStore::open_with_key(ctx.storage(), "guest");
    let mut member = CartStore::open_with_key(ctx.storage(), "member");

    guest.add_item(json!({"id": "A", "quantity": 1})).unwrap();
    member.add_item(json!({"id": "B", "quantity": 2})).unwrap();
    guest.clear().unwrap();

    assert!(!ctx.slot_path("guest").exists());
    assert!(ctx.slot_path("member").is_file());
    assert_eq!(
        summary(&CartStore::open_with_key(ctx.storage(), "member").cart()),
        vec![("B".to_string(), 2)]
    );
}
