use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value, json};

/// App state at the time a push notification arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PushMessageAppStatus {
    pub asleep: bool,
    pub closed: bool,
}

impl PushMessageAppStatus {
    pub fn was_asleep(&self) -> bool {
        self.asleep
    }

    pub fn was_closed(&self) -> bool {
        self.closed
    }
}

/// A push notification as delivered by the native push plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub app: PushMessageAppStatus,
    pub text: Option<String>,
    pub title: Option<String>,
    pub count: Option<u64>,
    pub sound: Option<String>,
    pub image: Option<String>,
    payload: Option<Value>,
    #[serde(skip)]
    raw: Value,
}

impl PushMessage {
    /// Parse the plugin's notification JSON.
    ///
    /// Development pushes carry no `additionalData`; they are treated as
    /// received in the foreground on a warm start. Empty strings and a zero
    /// count read as absent.
    pub fn from_plugin_json(raw: Value) -> Self {
        let mut raw = match raw {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if !raw.get("additionalData").is_some_and(Value::is_object) {
            raw.insert(
                "additionalData".to_string(),
                json!({"coldstart": false, "foreground": true}),
            );
        }

        let additional = &raw["additionalData"];
        let app = PushMessageAppStatus {
            asleep: !truthy(additional.get("foreground")),
            closed: truthy(additional.get("coldstart")),
        };
        let payload = additional
            .get("payload")
            .filter(|p| truthy(Some(*p)))
            .cloned();

        Self {
            app,
            text: string_field(&raw, "message"),
            title: string_field(&raw, "title"),
            count: count_field(&raw),
            sound: string_field(&raw, "sound"),
            image: string_field(&raw, "image"),
            payload,
            raw: Value::Object(raw),
        }
    }

    /// Custom payload sent with the notification, `{}` when there is none.
    pub fn payload(&self) -> Value {
        self.payload.clone().unwrap_or_else(|| json!({}))
    }

    /// The plugin JSON this message was parsed from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for PushMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<PushMessage ['{}']>",
            self.title.as_deref().unwrap_or("null")
        )
    }
}

/// Loose truthiness of plugin JSON: booleans, non-zero numbers, non-empty strings
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn string_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Badge count; the plugin sends it as a number or a numeric string
fn count_field(raw: &Map<String, Value>) -> Option<u64> {
    let count = match raw.get("count")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (count > 0).then_some(count)
}
