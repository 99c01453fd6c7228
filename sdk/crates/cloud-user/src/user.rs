use crate::{
    DataTypeRegistry, Identity, Operation, Session, SharedUser, StoredUser, StoredUserData,
    UserData, UserError, UserResult, UserValue,
};

use std::collections::BTreeSet;
use std::fmt;

use log::{error, info, warn};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A platform user: identity, custom data and profile details.
///
/// Users start anonymous and fresh. `fresh` stays set until a load or save
/// completes against the server; `dirty` is set when a save fails.
///
/// A clone is a detached copy: it gets its own instance id, so it is never
/// the session's current user even when the original is.
#[derive(Debug)]
pub struct User {
    instance: Uuid,
    id: Option<String>,
    data: UserData,
    details: Map<String, Value>,
    dirty: bool,
    fresh: bool,
    unset: BTreeSet<String>,
}

impl Clone for User {
    fn clone(&self) -> Self {
        Self {
            instance: Uuid::new_v4(),
            id: self.id.clone(),
            data: self.data.clone(),
            details: self.details.clone(),
            dirty: self.dirty,
            fresh: self.fresh,
            unset: self.unset.clone(),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

impl User {
    /// Anonymous user with no data
    pub fn new() -> Self {
        Self {
            instance: Uuid::new_v4(),
            id: None,
            data: UserData::new(),
            details: Map::new(),
            dirty: false,
            fresh: true,
            unset: BTreeSet::new(),
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let mut user = Self::new();
        user.set_id(Some(id.into()));
        user
    }

    pub fn from_record(record: StoredUser, registry: &DataTypeRegistry) -> Self {
        let mut user = Self::new();
        user.set_id(record.id);
        user.data = UserData::from_storage(&record.data.data, registry);
        user.details = record.details;
        user.fresh = record.fresh;
        user.dirty = record.dirty;
        user
    }

    pub fn to_record(&self) -> StoredUser {
        StoredUser {
            id: self.id.clone(),
            data: StoredUserData {
                data: Value::Object(self.data.to_storage()),
            },
            details: self.details.clone(),
            fresh: self.fresh,
            dirty: self.dirty,
        }
    }

    // =========================================================================
    // Identity and state
    // =========================================================================

    /// Identifies this in-memory instance, regardless of `id`.
    pub fn instance_id(&self) -> Uuid {
        self.instance
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Empty ids are treated as anonymous.
    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id.filter(|id| !id.is_empty());
    }

    /// In-flight registry key for this user.
    pub fn identity(&self) -> Identity {
        match &self.id {
            Some(id) => Identity::Id(id.clone()),
            None => Identity::Instance(self.instance),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Only the session's current user can be authenticated.
    pub fn is_authenticated(&self, session: &Session) -> bool {
        session.is_current(self) && session.is_authenticated()
    }

    // =========================================================================
    // Data
    // =========================================================================

    pub fn data(&self) -> &UserData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut UserData {
        &mut self.data
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.details
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<UserValue>) {
        let key = key.into();
        self.unset.remove(&key);
        self.data.set(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&UserValue> {
        self.data.get(key)
    }

    pub fn get_or(&self, key: &str, default: impl Into<UserValue>) -> UserValue {
        self.data.get_or(key, default)
    }

    /// Remove `key` and remember it as pending removal.
    ///
    /// Pending removals are kept for inspection only; saves do not send
    /// them.
    pub fn unset(&mut self, key: &str) -> Option<UserValue> {
        self.unset.insert(key.to_string());
        self.data.unset(key)
    }

    pub fn pending_unset(&self) -> &BTreeSet<String> {
        &self.unset
    }

    /// Body of `PATCH /auth/users/:id`: profile details at the top level,
    /// custom data under `custom`.
    pub fn to_api_format(&self) -> Value {
        let mut body = self.details.clone();
        body.insert("custom".to_string(), Value::Object(self.data.to_storage()));
        Value::Object(body)
    }

    // =========================================================================
    // Remote operations
    // =========================================================================

    /// Fetch the authenticated caller and install it as the current user.
    pub async fn fetch_self(session: &Session) -> UserResult<SharedUser> {
        let guard = session.in_flight().begin(Operation::Load, Identity::Caller)?;

        let body = guard
            .run(session.request_timeout(), session.client().get("/auth/users/self"))
            .await
            .inspect_err(|e| error!("Failed to load own user: {e}"))?;

        let data = response_data(&body)?;
        let id = data
            .get("uuid")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| UserError::malformed("response has no data.uuid"))?;

        let mut user = Self::with_id(id);
        user.apply_response(data, session.registry());
        info!("Loaded {user}");

        session.set_current(user)
    }

    /// Fetch any user by id. The session's current user is not touched.
    pub async fn load(session: &Session, id: &str) -> UserResult<Self> {
        if id.is_empty() {
            return Err(UserError::invalid("cannot load a user without an id"));
        }

        let mut user = Self::with_id(id);
        let guard = session.in_flight().begin(Operation::Load, user.identity())?;

        let path = format!("/auth/users/{id}");
        let body = guard
            .run(session.request_timeout(), session.client().get(&path))
            .await
            .inspect_err(|e| error!("Failed to load {user}: {e}"))?;

        user.apply_response(response_data(&body)?, session.registry());
        info!("Loaded {user}");

        Ok(user)
    }

    /// Persist locally (when current) and send to the server.
    ///
    /// A failed save leaves the user dirty. Anonymous users are stored
    /// locally but never sent.
    pub async fn save(&mut self, session: &Session) -> UserResult<Value> {
        let guard = session.in_flight().begin(Operation::Save, self.identity())?;

        if let Err(e) = self.store_if_current(session) {
            self.dirty = true;
            return Err(e);
        }

        let Some(id) = self.id.clone() else {
            self.dirty = true;
            warn!("Cannot save {self}: user has no id");
            return Err(UserError::invalid("cannot save a user without an id"));
        };

        let path = format!("/auth/users/{id}");
        let body = self.to_api_format();
        let result = guard
            .run(session.request_timeout(), session.client().patch(&path, &body))
            .await;

        match result {
            Ok(response) => {
                self.dirty = false;
                if !self.fresh {
                    self.unset.clear();
                }
                self.fresh = false;
                info!("Saved {self}");

                self.store_if_current(session)?;
                Ok(response)
            }
            Err(e) => {
                self.dirty = true;
                error!("Failed to save {self}: {e}");
                Err(e)
            }
        }
    }

    /// Delete on the server; the local record goes first when current.
    pub async fn delete(&self, session: &Session) -> UserResult<Value> {
        let Some(id) = self.id.as_deref() else {
            warn!("Cannot delete {self}: user has no id");
            return Err(UserError::invalid("cannot delete a user without an id"));
        };

        let guard = session.in_flight().begin(Operation::Delete, self.identity())?;

        if session.is_current(self) {
            session.context().delete()?;
        }

        let path = format!("/auth/users/{id}");
        let response = guard
            .run(session.request_timeout(), session.client().delete(&path))
            .await
            .inspect_err(|e| error!("Failed to delete {self}: {e}"))?;

        info!("Deleted {self}");
        Ok(response)
    }

    /// Ask the server to send a password reset. No local state changes.
    pub async fn reset_password(&self, session: &Session) -> UserResult<Value> {
        let Some(id) = self.id.as_deref() else {
            return Err(UserError::invalid("cannot reset the password of a user without an id"));
        };

        let path = format!("/auth/users/{id}/password-reset");
        let response = session
            .client()
            .post(&path, None)
            .await
            .inspect_err(|e| error!("Failed to reset password for {self}: {e}"))?;

        info!("Password reset requested for {self}");
        Ok(response)
    }

    fn store_if_current(&self, session: &Session) -> UserResult<()> {
        if session.is_current(self) {
            session.context().store(self)?;
        }
        Ok(())
    }

    /// Copy `custom` and `details` from a load response and mark not fresh.
    fn apply_response(&mut self, data: &Map<String, Value>, registry: &DataTypeRegistry) {
        let custom = data.get("custom").unwrap_or(&Value::Null);
        self.data = UserData::from_storage(custom, registry);
        self.details = match data.get("details") {
            Some(Value::Object(details)) => details.clone(),
            _ => Map::new(),
        };
        self.fresh = false;
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User ['{}']>", self.id.as_deref().unwrap_or("null"))
    }
}

/// `data` object of a load response.
fn response_data(body: &Value) -> UserResult<&Map<String, Value>> {
    body.get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| UserError::malformed("response has no data object"))
}
