use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Current-user record as persisted under the primary storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: StoredUserData,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub details: Map<String, Value>,
    #[serde(rename = "_fresh", default, deserialize_with = "flag")]
    pub fresh: bool,
    #[serde(rename = "_dirty", default, deserialize_with = "flag")]
    pub dirty: bool,
}

/// Wrapper around the custom data map (`data.data`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUserData {
    #[serde(default = "empty_object")]
    pub data: Value,
}

impl Default for StoredUserData {
    fn default() -> Self {
        Self {
            data: empty_object(),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Profile details that are not an object (`null`, missing) read as empty.
fn object_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

/// `true` only for a literal `true`; `null` and other values read as unset.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}
