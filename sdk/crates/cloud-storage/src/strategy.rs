use crate::StorageResult;

use std::path::PathBuf;

/// Raw string slot store behind [`crate::Storage`].
///
/// Implementations must be safe to share between tasks; last writer wins.
pub trait StorageStrategy: Send + Sync {
    /// Text stored under `key`, or `None` when the slot is empty.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the text stored under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Empty the slot. Removing an empty slot is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Move an unreadable value out of the slot.
    ///
    /// Returns where the value was moved to, if it was kept at all.
    fn quarantine(&self, key: &str) -> StorageResult<Option<PathBuf>> {
        self.remove(key)?;
        Ok(None)
    }
}
