use crate::{
    DataTypeRegistry, LEGACY_KEY_SUFFIX, MIGRATED_FLAG, STORAGE_KEY_PREFIX, StoredUser, User,
    UserResult,
};

use std::sync::Arc;

use cloud_storage::Storage;
use log::{debug, info, warn};
use serde_json::{Value, json};

/// Persistence boundary for the current user of one app.
///
/// The record lives under `ionic_io_user_<app_id>`. The first time a record
/// is seen it is also copied to `<key>_legacy`, which feeds the one-time
/// migration of pre-existing custom data.
#[derive(Debug, Clone)]
pub struct UserContext {
    storage: Storage,
    key: String,
    legacy_key: String,
    registry: Arc<DataTypeRegistry>,
}

impl UserContext {
    pub fn new(storage: Storage, app_id: &str, registry: Arc<DataTypeRegistry>) -> Self {
        let key = format!("{STORAGE_KEY_PREFIX}{app_id}");
        let legacy_key = format!("{key}{LEGACY_KEY_SUFFIX}");
        Self {
            storage,
            key,
            legacy_key,
            registry,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn legacy_key(&self) -> &str {
        &self.legacy_key
    }

    pub fn registry(&self) -> &DataTypeRegistry {
        &self.registry
    }

    /// Persist `user` as the current user.
    pub fn store(&self, user: &User) -> UserResult<()> {
        if let Some(raw) = self.raw_data()? {
            self.store_legacy_data(&raw)?;
        }

        if user.data().get(MIGRATED_FLAG).is_some_and(|v| v.is_truthy()) {
            self.storage
                .store_object(&self.legacy_key, &json!({ MIGRATED_FLAG: true }))?;
        }

        self.storage.store_object(&self.key, &user.to_record())?;
        debug!("Stored {user} under '{}'", self.key);
        Ok(())
    }

    /// Stored current user, if any.
    ///
    /// A record that cannot be read as a user is logged and treated as
    /// absent.
    pub fn load(&self) -> UserResult<Option<User>> {
        let Some(raw) = self.raw_data()? else {
            return Ok(None);
        };

        self.store_legacy_data(&raw)?;

        match serde_json::from_value::<StoredUser>(raw) {
            Ok(record) => {
                let user = User::from_record(record, &self.registry);
                info!("Loaded {user} from '{}'", self.key);
                Ok(Some(user))
            }
            Err(e) => {
                warn!("Stored user under '{}' is unreadable: {e}", self.key);
                Ok(None)
            }
        }
    }

    /// Remove the current-user record. The legacy slot is kept.
    pub fn delete(&self) -> UserResult<()> {
        self.storage.delete_object(&self.key)?;
        debug!("Deleted stored user '{}'", self.key);
        Ok(())
    }

    /// Raw record under the primary key.
    pub fn raw_data(&self) -> UserResult<Option<Value>> {
        Ok(present(self.storage.retrieve_object(&self.key)?))
    }

    /// Raw record under the legacy key.
    pub fn raw_legacy_data(&self) -> UserResult<Option<Value>> {
        Ok(present(self.storage.retrieve_object(&self.legacy_key)?))
    }

    /// Copy `data` into the legacy slot unless it already holds a record.
    pub fn store_legacy_data(&self, data: &Value) -> UserResult<()> {
        if self.raw_legacy_data()?.is_none() {
            self.storage.store_object(&self.legacy_key, data)?;
            info!("Kept legacy snapshot under '{}'", self.legacy_key);
        }
        Ok(())
    }
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
}
