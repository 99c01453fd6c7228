use crate::{StorageResult, StorageStrategy};

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process strategy. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStrategy {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic mid-insert leaves the map itself consistent
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageStrategy for MemoryStrategy {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}
