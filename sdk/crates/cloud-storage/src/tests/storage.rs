use crate::{FileStrategy, MemoryStrategy, Storage, StorageStrategy};

use std::sync::Arc;

use cloud_config::{Config, StorageBackend};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn given_stored_object_when_retrieve_then_same_json() {
    let storage = Storage::in_memory();
    let record = json!({"_id": "u1", "data": {"data": {"a": 1}}, "_fresh": false});

    storage.store_object("ionic_io_user_app", &record).unwrap();

    assert_eq!(storage.retrieve_object("ionic_io_user_app").unwrap(), Some(record));
}

#[test]
fn given_empty_slot_when_retrieve_then_none() {
    let storage = Storage::in_memory();

    assert!(storage.retrieve_object("missing").unwrap().is_none());
}

#[test]
fn given_blank_text_in_slot_when_retrieve_then_none() {
    let strategy = Arc::new(MemoryStrategy::new());
    strategy.set("key", "   ").unwrap();
    let storage = Storage::from_shared(strategy);

    assert!(storage.retrieve_object("key").unwrap().is_none());
}

#[test]
fn given_corrupted_text_in_slot_when_retrieve_then_none_and_slot_cleared() {
    let strategy = Arc::new(MemoryStrategy::new());
    strategy.set("key", "{not json").unwrap();
    let storage = Storage::from_shared(strategy.clone());

    assert!(storage.retrieve_object("key").unwrap().is_none());
    assert!(strategy.get("key").unwrap().is_none());
}

#[test]
fn given_corrupted_file_when_retrieve_then_none_and_backup_kept() {
    let temp = TempDir::new().unwrap();
    let strategy = Arc::new(FileStrategy::new(temp.path()).unwrap());
    strategy.set("key", "{not json").unwrap();
    let storage = Storage::from_shared(strategy.clone());

    assert!(storage.retrieve_object("key").unwrap().is_none());
    let backups = std::fs::read_dir(temp.path())
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .contains("corrupted")
        })
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn given_stored_object_when_delete_then_slot_empty() {
    let storage = Storage::in_memory();
    storage.store_object("key", &json!({"a": true})).unwrap();

    storage.delete_object("key").unwrap();

    assert!(storage.retrieve_object("key").unwrap().is_none());
}

#[test]
fn given_clone_when_writing_through_one_then_other_sees_it() {
    let storage = Storage::in_memory();
    let clone = storage.clone();

    clone.store_object("key", &json!("shared")).unwrap();

    assert_eq!(storage.retrieve_object("key").unwrap(), Some(json!("shared")));
}

#[test]
fn given_memory_backend_config_when_from_config_then_memory_storage() {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;

    let storage = Storage::from_config(&config).unwrap();
    storage.store_object("key", &json!(1)).unwrap();

    assert_eq!(storage.retrieve_object("key").unwrap(), Some(json!(1)));
}
