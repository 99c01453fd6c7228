use crate::{CustomData, DataType};

use std::any::Any;

use serde_json::Value;

/// Ordered list of JSON values without duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueArray {
    items: Vec<Value>,
}

impl UniqueArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` unless an equal value is already present.
    pub fn push(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Remove `value`, returns whether it was present.
    pub fn pull(&mut self, value: &Value) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for UniqueArray {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut array = Self::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl CustomData for UniqueArray {
    fn schema(&self) -> &str {
        Self::SCHEMA
    }

    fn to_storage(&self) -> Value {
        Value::Array(self.items.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DataType for UniqueArray {
    const SCHEMA: &'static str = "UniqueArray";

    /// Duplicates in the stored payload are dropped.
    fn from_storage(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(items.into_iter().collect()),
            _ => None,
        }
    }
}
