use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::trace;
use serde_json::Value;

pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Synchronous named-event bus.
///
/// Handlers run on the emitting task, in registration order. Clones share
/// the same handler table.
#[derive(Clone, Default)]
pub struct EventEmitter {
    inner: Arc<RwLock<EmitterInner>>,
}

#[derive(Default)]
struct EmitterInner {
    handlers: HashMap<String, Vec<EventHandler>>,
    /// Every event name emitted at least once
    emitted: HashSet<String>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`
    pub fn on<F>(&self, event: &str, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.write()
            .handlers
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Call every handler for `event`, returns how many ran.
    pub fn emit(&self, event: &str, data: &Value) -> usize {
        // Handlers may register or emit themselves, so the lock is released first
        let handlers = {
            let mut inner = self.write();
            inner.emitted.insert(event.to_string());
            inner.handlers.get(event).cloned().unwrap_or_default()
        };

        trace!("emit {event} -> {} handler(s)", handlers.len());
        for handler in &handlers {
            handler(data);
        }

        handlers.len()
    }

    /// Whether `event` has been emitted at least once
    pub fn emitted(&self, event: &str) -> bool {
        self.read().emitted.contains(event)
    }

    /// Run `handler` exactly once: now if `event` already fired, otherwise
    /// on its next emit. Later emits skip it.
    pub fn on_emitted<F>(&self, event: &str, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        if self.emitted(event) {
            handler(&Value::Null);
            return;
        }

        let fired = AtomicBool::new(false);
        self.on(event, move |data| {
            if !fired.swap(true, Ordering::SeqCst) {
                handler(data);
            }
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, EmitterInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, EmitterInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
