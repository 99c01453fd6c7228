use crate::data_type::tagged;
use crate::{CustomData, UniqueArray};

use std::sync::Arc;

use serde_json::Value;

/// One custom-data entry of a user.
#[derive(Debug, Clone)]
pub enum UserValue {
    Json(Value),
    UniqueArray(UniqueArray),
    /// A type registered in the session's data type registry
    Custom(Arc<dyn CustomData>),
}

impl UserValue {
    pub fn custom(data: impl CustomData) -> Self {
        Self::Custom(Arc::new(data))
    }

    /// Stored form; custom types are wrapped in their schema tag.
    pub fn to_storage(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::UniqueArray(array) => tagged(array.schema(), array.to_storage()),
            Self::Custom(data) => tagged(data.schema(), data.to_storage()),
        }
    }

    /// Schema name for custom types.
    pub fn schema(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::UniqueArray(array) => Some(array.schema()),
            Self::Custom(data) => Some(data.schema()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json()?.as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_json()?.as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_json()?.as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_json()?.as_bool()
    }

    pub fn as_unique_array(&self) -> Option<&UniqueArray> {
        match self {
            Self::UniqueArray(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_unique_array_mut(&mut self) -> Option<&mut UniqueArray> {
        match self {
            Self::UniqueArray(array) => Some(array),
            _ => None,
        }
    }

    /// Borrow a registered custom type as `T`.
    pub fn downcast_ref<T: CustomData>(&self) -> Option<&T> {
        match self {
            Self::Custom(data) => data.as_any().downcast_ref::<T>(),
            Self::UniqueArray(array) => (array as &dyn std::any::Any).downcast_ref::<T>(),
            Self::Json(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// Loose truthiness: `null`, `false`, `0` and `""` are false, custom
    /// types are always true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Json(Value::Null) => false,
            Self::Json(Value::Bool(b)) => *b,
            Self::Json(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Self::Json(Value::String(s)) => !s.is_empty(),
            Self::Json(_) | Self::UniqueArray(_) | Self::Custom(_) => true,
        }
    }
}

impl PartialEq for UserValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::UniqueArray(a), Self::UniqueArray(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => {
                a.schema() == b.schema() && a.to_storage() == b.to_storage()
            }
            _ => false,
        }
    }
}

impl PartialEq<Value> for UserValue {
    fn eq(&self, other: &Value) -> bool {
        self.as_json() == Some(other)
    }
}

impl Default for UserValue {
    fn default() -> Self {
        Self::Json(Value::Null)
    }
}

impl From<Value> for UserValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<UniqueArray> for UserValue {
    fn from(array: UniqueArray) -> Self {
        Self::UniqueArray(array)
    }
}

impl From<&str> for UserValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<String> for UserValue {
    fn from(value: String) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<bool> for UserValue {
    fn from(value: bool) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i64> for UserValue {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i32> for UserValue {
    fn from(value: i32) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<u64> for UserValue {
    fn from(value: u64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<f64> for UserValue {
    fn from(value: f64) -> Self {
        Self::Json(Value::from(value))
    }
}
