use crate::{FileStrategy, MemoryStrategy, StorageError, StorageResult, StorageStrategy};

use std::fmt;
use std::sync::Arc;

use cloud_config::{Config, StorageBackend};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

/// JSON object store over a [`StorageStrategy`].
///
/// Cheap to clone; clones share the same strategy.
#[derive(Clone)]
pub struct Storage {
    strategy: Arc<dyn StorageStrategy>,
}

impl Storage {
    pub fn new(strategy: impl StorageStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    pub fn from_shared(strategy: Arc<dyn StorageStrategy>) -> Self {
        Self { strategy }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStrategy::new())
    }

    /// Build the backend selected by `storage.backend`.
    pub fn from_config(config: &Config) -> StorageResult<Self> {
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::File => {
                let dir = config.storage_path()?;
                info!("Using file storage at {dir:?}");
                Ok(Self::new(FileStrategy::new(dir)?))
            }
        }
    }

    /// Serialize `value` and store it under `key`.
    pub fn store_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let json =
            serde_json::to_string(value).map_err(|e| StorageError::serialization(key, e))?;
        self.strategy.set(key, &json)
    }

    /// Record stored under `key`.
    ///
    /// An empty slot and an unreadable record both read as `None`; the
    /// unreadable record is quarantined so it can be inspected later.
    pub fn retrieve_object(&self, key: &str) -> StorageResult<Option<Value>> {
        let Some(json) = self.strategy.get(key)? else {
            return Ok(None);
        };

        if json.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Record '{key}' is corrupted: {e}");
                self.strategy.quarantine(key)?;
                Ok(None)
            }
        }
    }

    pub fn delete_object(&self, key: &str) -> StorageResult<()> {
        self.strategy.remove(key)
    }

    /// Underlying strategy, for callers that need raw access.
    pub fn strategy(&self) -> &Arc<dyn StorageStrategy> {
        &self.strategy
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
