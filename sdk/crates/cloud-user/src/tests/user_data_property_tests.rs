use crate::{UserData, UserValue};

use proptest::prelude::*;
use serde_json::Value;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn given_any_value_when_set_then_get_returns_it(key in "[a-z_]{1,12}", value in scalar()) {
        let mut data = UserData::new();

        data.set(key.clone(), value.clone());

        prop_assert_eq!(data.get(&key), Some(&UserValue::Json(value.clone())));
        prop_assert_eq!(data.get_or(&key, "default"), UserValue::Json(value));
    }

    #[test]
    fn given_missing_key_when_get_or_falsy_literal_then_literal(key in "[a-z_]{1,12}", flag in any::<bool>()) {
        let data = UserData::new();
        let default = if flag { Value::from(0) } else { Value::from(false) };

        prop_assert_eq!(data.get_or(&key, default.clone()), UserValue::Json(default));
    }

    #[test]
    fn given_sets_when_to_storage_then_every_key_present(keys in proptest::collection::btree_set("[a-z]{1,8}", 0..10)) {
        let mut data = UserData::new();
        for key in &keys {
            data.set(key.clone(), key.len() as i64);
        }

        let stored = data.to_storage();

        prop_assert_eq!(stored.len(), keys.len());
        for key in &keys {
            prop_assert_eq!(&stored[key], &Value::from(key.len() as i64));
        }
    }
}
