use crate::tests::support::{Point, registry_with_point};
use crate::{DATA_TYPE_SCHEMA_TAG, DataTypeRegistry, UserData, UserValue};

use serde_json::{Value, json};

#[test]
fn given_set_when_get_then_value_returned() {
    let mut data = UserData::new();

    data.set("k", "v");

    assert_eq!(data.get("k"), Some(&UserValue::from("v")));
}

#[test]
fn given_stored_falsy_values_when_get_or_then_stored_values_win() {
    let mut data = UserData::new();
    data.set("zero", 0);
    data.set("no", false);
    data.set("empty", "");

    assert_eq!(data.get_or("zero", 5), UserValue::from(0));
    assert_eq!(data.get_or("no", true), UserValue::from(false));
    assert_eq!(data.get_or("empty", "fallback"), UserValue::from(""));
}

#[test]
fn given_missing_key_when_get_or_zero_or_false_then_literal_default() {
    let data = UserData::new();

    assert_eq!(data.get_or("missing", 0), UserValue::from(0));
    assert_eq!(data.get_or("missing", false), UserValue::from(false));
}

#[test]
fn given_missing_key_when_get_or_empty_default_then_null() {
    let data = UserData::new();

    assert!(data.get_or("missing", "").is_null());
    assert!(data.get_or("missing", Value::Null).is_null());
    assert_eq!(data.get_or("missing", "x"), UserValue::from("x"));
}

#[test]
fn given_unset_when_key_absent_then_no_error() {
    let mut data = UserData::new();
    data.set("k", 1);

    assert!(data.unset("k").is_some());
    assert!(data.unset("k").is_none());
    assert!(!data.contains_key("k"));
}

#[test]
fn given_non_object_raw_when_from_storage_then_empty() {
    let registry = DataTypeRegistry::new();

    assert!(UserData::from_storage(&json!([1, 2]), &registry).is_empty());
    assert!(UserData::from_storage(&Value::Null, &registry).is_empty());
}

#[test]
fn given_raw_with_tagged_values_when_from_storage_then_decoded_once() {
    let registry = registry_with_point();
    let raw = json!({
        "name": "ada",
        "home": {DATA_TYPE_SCHEMA_TAG: "Point", "value": {"x": 5, "y": 6}},
        "tags": {DATA_TYPE_SCHEMA_TAG: "UniqueArray", "value": ["a"]},
    });

    let data = UserData::from_storage(&raw, &registry);

    assert_eq!(data.len(), 3);
    assert_eq!(data.get("name"), Some(&UserValue::from("ada")));
    assert_eq!(
        data.get("home").and_then(|v| v.downcast_ref::<Point>()),
        Some(&Point { x: 5, y: 6 })
    );
    assert_eq!(Value::Object(data.to_storage()), raw);
}
