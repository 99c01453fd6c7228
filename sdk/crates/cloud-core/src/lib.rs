pub mod event_emitter;
pub mod push_message;


pub use event_emitter::{EventEmitter, EventHandler};
pub use push_message::{PushMessage, PushMessageAppStatus};

// Event names shared by the SDK crates
pub const EVENT_CORE_INIT: &str = "core:init";
pub const EVENT_AUTH_TOKEN_CHANGED: &str = "auth:token-changed";
pub const EVENT_PUSH_NOTIFICATION: &str = "push:notification";
pub const EVENT_APP_RESUME: &str = "app:resume";
