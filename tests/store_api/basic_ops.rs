//! Basic Store Operations Tests
//!
//! Tests for set, put, get, get_or, show.

use crate::*;
use sessionstore::SetOutcome;

// =============================================================================
// SET / GET TESTS
// =============================================================================

#[test]
fn test_set_and_get_roundtrip() {
    let mut store = VersionedStore::new(3);

    store.set("key1", 42);
    assert_eq!(store.get("key1"), Some(&Value::Int(42)));
}

#[test]
fn test_set_all_value_types() {
    let mut store = VersionedStore::new(3);

    for (name, value) in standard_test_values() {
        let key = format!("type:{}", name);
        store.set(key.as_str(), value.clone());
        assert_eq!(store.get(&key), Some(&value), "Failed for type: {}", name);
    }
}

#[test]
fn test_set_overwrites_existing() {
    let mut store = VersionedStore::new(3);

    store.set("key", 1);
    store.set("key", 2);
    assert_eq!(store.get("key"), Some(&Value::Int(2)));
}

#[test]
fn test_get_missing_returns_default_without_mutation() {
    let store = VersionedStore::new(3);
    let default = Value::from("default");

    assert_eq!(store.get_or("missing", &default), &default);
    assert_eq!(store.get("missing"), None);
    assert_eq!(store.history_len("missing"), 0);
    assert!(store.show().is_empty());
}

// =============================================================================
// DEDUPLICATION TESTS
// =============================================================================

#[test]
fn test_same_value_twice_records_once() {
    let mut store = VersionedStore::new(3);

    store.set("s", "a");
    store.set("s", "a");
    assert_eq!(store.history_len("s"), 1);
}

#[test]
fn test_put_reports_outcome() {
    let mut store = VersionedStore::new(3);

    assert_eq!(store.put("k", 1), SetOutcome::Recorded);
    assert_eq!(store.put("k", 1), SetOutcome::Unchanged);
    assert_eq!(store.put("k", 2), SetOutcome::Recorded);
}

#[test]
fn test_every_standard_value_deduplicates() {
    let mut store = VersionedStore::new(3);

    for (name, value) in standard_test_values() {
        store.set(name, value.clone());
        assert_eq!(store.put(name, value), SetOutcome::Unchanged, "type: {}", name);
    }
}

#[test]
fn test_nan_deduplicates_by_bits() {
    let mut store = VersionedStore::new(3);

    store.set("nan", f64::NAN);
    assert_eq!(store.put("nan", f64::NAN), SetOutcome::Unchanged);
}

#[test]
fn test_int_and_float_are_distinct_writes() {
    let mut store = VersionedStore::new(3);

    store.set("n", 1);
    assert_eq!(store.put("n", 1.0), SetOutcome::Recorded);
    assert_eq!(store.get("n"), Some(&Value::Float(1.0)));
}

#[test]
fn test_object_insertion_order_does_not_matter() {
    let mut store = VersionedStore::new(3);

    let forward: Value = Value::Object(
        [("a".to_string(), Value::Int(1)), ("b".to_string(), Value::Int(2))]
            .into_iter()
            .collect(),
    );
    let backward: Value = Value::Object(
        [("b".to_string(), Value::Int(2)), ("a".to_string(), Value::Int(1))]
            .into_iter()
            .collect(),
    );

    store.set("obj", forward);
    assert_eq!(store.put("obj", backward), SetOutcome::Unchanged);
}

// =============================================================================
// SHOW TESTS
// =============================================================================

#[test]
fn test_show_returns_all_current_values() {
    let mut store = VersionedStore::new(3);

    store.set("string", "Hello, World!");
    store.set("integer", 42);
    store.set("list", vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let shown = store.show();
    assert_eq!(shown.len(), 3);
    assert_eq!(shown["integer"], &Value::Int(42));
    assert_eq!(shown["string"], &Value::from("Hello, World!"));
    assert_eq!(store.len(), 3);

    let mut keys: Vec<_> = store.keys().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["integer", "list", "string"]);
}

#[test]
fn test_null_is_a_present_value() {
    let mut store = VersionedStore::new(3);

    store.set("none_value", Value::Null);
    assert_eq!(store.get("none_value"), Some(&Value::Null));
    assert!(store.contains_key("none_value"));
}
