use crate::{DATA_TYPE_SCHEMA_TAG, DATA_TYPE_VALUE_KEY, UniqueArray, UserError, UserResult, UserValue};

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Map, Value};

/// A value type stored in user data under a schema name.
pub trait CustomData: fmt::Debug + Send + Sync + 'static {
    fn schema(&self) -> &str;

    /// Payload written next to the schema tag.
    fn to_storage(&self) -> Value;

    fn as_any(&self) -> &dyn Any;
}

/// A [`CustomData`] type that can be rebuilt from its stored payload.
pub trait DataType: CustomData + Sized {
    const SCHEMA: &'static str;

    fn from_storage(value: Value) -> Option<Self>;
}

type Decoder = fn(Value) -> Option<Arc<dyn CustomData>>;

fn decode<T: DataType>(value: Value) -> Option<Arc<dyn CustomData>> {
    T::from_storage(value).map(|data| Arc::new(data) as Arc<dyn CustomData>)
}

/// Schema name to decoder lookup used when reading stored user data.
///
/// [`UniqueArray`] is built in; applications register their own types
/// before building the session.
#[derive(Default, Clone)]
pub struct DataTypeRegistry {
    decoders: HashMap<String, Decoder>,
}

impl DataTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under [`DataType::SCHEMA`].
    pub fn register<T: DataType>(&mut self) -> UserResult<()> {
        if T::SCHEMA == UniqueArray::SCHEMA {
            return Err(UserError::data_type(T::SCHEMA, "schema is reserved"));
        }
        if self.decoders.contains_key(T::SCHEMA) {
            return Err(UserError::data_type(T::SCHEMA, "schema already registered"));
        }

        self.decoders.insert(T::SCHEMA.to_string(), decode::<T>);
        debug!("Registered data type '{}'", T::SCHEMA);
        Ok(())
    }

    pub fn contains(&self, schema: &str) -> bool {
        schema == UniqueArray::SCHEMA || self.decoders.contains_key(schema)
    }

    /// Resolve one stored value.
    ///
    /// Values without a schema tag, with an unknown tag, or whose payload the
    /// type rejects stay plain JSON.
    pub fn resolve(&self, value: Value) -> UserValue {
        let Some(schema) = schema_of(&value) else {
            return UserValue::Json(value);
        };

        if schema == UniqueArray::SCHEMA {
            return match UniqueArray::from_storage(payload_of(&value)) {
                Some(array) => UserValue::UniqueArray(array),
                None => {
                    warn!("Stored '{schema}' payload is not an array, keeping raw value");
                    UserValue::Json(value)
                }
            };
        }

        let Some(decoder) = self.decoders.get(schema) else {
            return UserValue::Json(value);
        };

        match decoder(payload_of(&value)) {
            Some(data) => UserValue::Custom(data),
            None => {
                warn!("Stored '{schema}' payload was rejected, keeping raw value");
                UserValue::Json(value)
            }
        }
    }
}

impl fmt::Debug for DataTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut schemas: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        schemas.sort_unstable();
        f.debug_struct("DataTypeRegistry")
            .field("schemas", &schemas)
            .finish()
    }
}

/// `{ "__Ionic_DataTypeSchema": <schema>, "value": <payload> }`
pub(crate) fn tagged(schema: &str, payload: Value) -> Value {
    let mut map = Map::new();
    map.insert(DATA_TYPE_SCHEMA_TAG.to_string(), Value::String(schema.to_string()));
    map.insert(DATA_TYPE_VALUE_KEY.to_string(), payload);
    Value::Object(map)
}

fn schema_of(value: &Value) -> Option<&str> {
    value.as_object()?.get(DATA_TYPE_SCHEMA_TAG)?.as_str()
}

fn payload_of(value: &Value) -> Value {
    value.get(DATA_TYPE_VALUE_KEY).cloned().unwrap_or(Value::Null)
}
