use crate::{DataTypeRegistry, UserValue};

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Custom attributes of a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserData {
    data: BTreeMap<String, UserValue>,
}

impl UserData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a stored or API map, decoding tagged custom types.
    ///
    /// Anything other than a JSON object yields empty data.
    pub fn from_storage(raw: &Value, registry: &DataTypeRegistry) -> Self {
        match raw {
            Value::Object(map) => Self::from_map(map.clone(), registry),
            _ => Self::new(),
        }
    }

    pub fn from_map(map: Map<String, Value>, registry: &DataTypeRegistry) -> Self {
        let data = map
            .into_iter()
            .map(|(key, value)| (key, registry.resolve(value)))
            .collect();
        Self { data }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<UserValue>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn unset(&mut self, key: &str) -> Option<UserValue> {
        self.data.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&UserValue> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut UserValue> {
        self.data.get_mut(key)
    }

    /// Stored value, or `default` when `key` is missing.
    ///
    /// Stored falsy values are returned as is. A default of `0` or `false`
    /// is honored; an empty string default reads as `null`.
    pub fn get_or(&self, key: &str, default: impl Into<UserValue>) -> UserValue {
        if let Some(value) = self.data.get(key) {
            return value.clone();
        }

        match default.into() {
            UserValue::Json(Value::String(s)) if s.is_empty() => UserValue::Json(Value::Null),
            default => default,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UserValue)> {
        self.data.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Stored form of every entry.
    pub fn to_storage(&self) -> Map<String, Value> {
        self.data
            .iter()
            .map(|(key, value)| (key.clone(), value.to_storage()))
            .collect()
    }
}
