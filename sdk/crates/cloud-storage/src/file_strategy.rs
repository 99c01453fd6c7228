use crate::{DATE_FORMAT, FILE_EXTENSION, StorageError, StorageResult, StorageStrategy};

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go through a temp file, fsync and an atomic rename so a crash
/// mid-write never leaves a half-written record behind.
#[derive(Debug, Clone)]
pub struct FileStrategy {
    dir: PathBuf,
}

impl FileStrategy {
    /// Create the strategy, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::dir_creation(dir.clone(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.{FILE_EXTENSION}"))
    }
}

impl StorageStrategy for FileStrategy {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::file_read(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let final_path = self.path_for(key);

        // Each write gets its own temp file; concurrent writers race only on the rename.
        let mut temp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| StorageError::file_write(final_path.clone(), e))?;
        let temp_path = temp.path().to_path_buf();

        temp.write_all(value.as_bytes())
            .map_err(|e| StorageError::file_write(temp_path.clone(), e))?;

        temp.as_file()
            .sync_all()
            .map_err(|e| StorageError::file_write(temp_path.clone(), e))?;

        temp.persist(&final_path).map_err(|e| {
            StorageError::atomic_rename(temp_path.clone(), final_path.clone(), e.error)
        })?;

        debug!("Stored '{key}' at {final_path:?}");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::file_remove(path, e)),
        }
    }

    /// Renames `<key>.json` to `<key>.json.corrupted.{timestamp}`.
    fn quarantine(&self, key: &str) -> StorageResult<Option<PathBuf>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let backup_path = path.with_extension(format!("{FILE_EXTENSION}.corrupted.{timestamp}"));

        fs::rename(&path, &backup_path)
            .map_err(|e| StorageError::backup_failed(path.clone(), e))?;

        warn!("Backed up corrupted record '{key}' to {backup_path:?}");
        Ok(Some(backup_path))
    }
}
