use crate::{CustomData, DataType, DataTypeRegistry, Session};

use std::any::Any;
use std::time::Duration;

use cloud_client::Client;
use cloud_storage::Storage;
use serde_json::{Value, json};

pub(crate) const APP_ID: &str = "a1b2c3";

/// Application-defined type used to exercise the registry
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Point {
    pub x: i64,
    pub y: i64,
}

impl CustomData for Point {
    fn schema(&self) -> &str {
        Self::SCHEMA
    }

    fn to_storage(&self) -> Value {
        json!({"x": self.x, "y": self.y})
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DataType for Point {
    const SCHEMA: &'static str = "Point";

    fn from_storage(value: Value) -> Option<Self> {
        Some(Self {
            x: value.get("x")?.as_i64()?,
            y: value.get("y")?.as_i64()?,
        })
    }
}

pub(crate) fn registry_with_point() -> DataTypeRegistry {
    let mut registry = DataTypeRegistry::new();
    registry.register::<Point>().unwrap();
    registry
}

/// Offline session over in-memory storage
pub(crate) fn offline_session(storage: Storage) -> Session {
    Session::new(
        Client::new("http://127.0.0.1:9"),
        storage,
        APP_ID,
        registry_with_point(),
        Duration::from_secs(5),
    )
}
