use crate::{
    DataTypeRegistry, InFlightRegistry, Insights, MIGRATED_FLAG, STAT_APP_OPENED,
    STAT_APP_OPENED_PUSH, User, UserContext, UserData, UserResult, UserValue,
};

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use cloud_client::Client;
use cloud_config::{Config, InsightsConfig};
use cloud_core::{
    EVENT_APP_RESUME, EVENT_AUTH_TOKEN_CHANGED, EVENT_CORE_INIT, EVENT_PUSH_NOTIFICATION,
    EventEmitter, PushMessage,
};
use cloud_storage::Storage;
use log::{debug, info};
use serde_json::{Value, json};
use uuid::Uuid;

/// The current user, shared between the session and its callers.
pub type SharedUser = Arc<tokio::sync::Mutex<User>>;

/// Application session: owns the collaborators every user operation needs
/// and the current-user slot.
pub struct Session {
    client: Arc<Client>,
    context: UserContext,
    registry: Arc<DataTypeRegistry>,
    token: RwLock<Option<String>>,
    events: EventEmitter,
    insights: Arc<Insights>,
    in_flight: InFlightRegistry,
    request_timeout: Duration,
    current: Mutex<Option<(Uuid, SharedUser)>>,
}

impl Session {
    /// Wire a session with default insights settings and emit `core:init`.
    pub fn new(
        client: Client,
        storage: Storage,
        app_id: &str,
        registry: DataTypeRegistry,
        request_timeout: Duration,
    ) -> Self {
        Self::with_insights(
            client,
            storage,
            app_id,
            registry,
            request_timeout,
            InsightsConfig::default(),
        )
    }

    /// Wire a session and emit `core:init`.
    ///
    /// The auth state starts from the client's token; later changes go
    /// through [`Session::set_token`], which keeps the client in step.
    /// `mobileapp.opened` is counted on init and resume, and
    /// `mobileapp.opened.push` for pushes that arrive while the app was
    /// asleep or closed.
    pub fn with_insights(
        client: Client,
        storage: Storage,
        app_id: &str,
        registry: DataTypeRegistry,
        request_timeout: Duration,
        insights: InsightsConfig,
    ) -> Self {
        let client = Arc::new(client);
        let registry = Arc::new(registry);
        let events = EventEmitter::new();

        let token_client = Arc::clone(&client);
        events.on(EVENT_AUTH_TOKEN_CHANGED, move |change| {
            let token = change.get("new").and_then(Value::as_str).map(String::from);
            token_client.set_token(token);
        });

        let insights = Insights::new(Arc::clone(&client), app_id, insights);
        insights.start();
        for event in [EVENT_CORE_INIT, EVENT_APP_RESUME] {
            let tracker = Arc::clone(&insights);
            events.on(event, move |_| tracker.track(STAT_APP_OPENED));
        }
        let tracker = Arc::clone(&insights);
        events.on(EVENT_PUSH_NOTIFICATION, move |data| {
            let app = data.pointer("/message/app");
            let flag = |name: &str| {
                app.and_then(|app| app.get(name))
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            };
            if flag("asleep") || flag("closed") {
                tracker.track(STAT_APP_OPENED_PUSH);
            }
        });

        let session = Self {
            token: RwLock::new(client.token()),
            context: UserContext::new(storage, app_id, Arc::clone(&registry)),
            client,
            registry,
            events,
            insights,
            in_flight: InFlightRegistry::new(),
            request_timeout,
            current: Mutex::new(None),
        };

        info!("Session initialised for app '{app_id}'");
        session
            .events
            .emit(EVENT_CORE_INIT, &json!({ "app_id": app_id }));
        session
    }

    /// Session for `config`: storage backend, API client, token, request
    /// timeout and insights settings all come from it. Validate the config
    /// first.
    pub fn from_config(config: &Config, registry: DataTypeRegistry) -> UserResult<Self> {
        let storage = Storage::from_config(config)?;
        let client = Client::from_config(config)?;

        Ok(Self::with_insights(
            client,
            storage,
            &config.app.app_id,
            registry,
            config.request.timeout(),
            config.insights.clone(),
        ))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn context(&self) -> &UserContext {
        &self.context
    }

    pub fn registry(&self) -> &DataTypeRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn insights(&self) -> &Insights {
        &self.insights
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// Deadline applied to every guarded remote operation.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    // =========================================================================
    // Auth state
    // =========================================================================

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Replace the token and emit `auth:token-changed` when it differs.
    pub fn set_token(&self, token: Option<String>) {
        let old = {
            let mut current = self.token.write().unwrap_or_else(|e| e.into_inner());
            if *current == token {
                return;
            }
            std::mem::replace(&mut *current, token.clone())
        };

        debug!(
            "Auth token {}",
            if token.is_some() { "updated" } else { "cleared" }
        );
        self.events.emit(
            EVENT_AUTH_TOKEN_CHANGED,
            &json!({ "old": old, "new": token }),
        );
    }

    // =========================================================================
    // Current user
    // =========================================================================

    /// The current user, loaded from storage on first use.
    ///
    /// Falls back to a fresh anonymous user when nothing is stored. Repeated
    /// calls return the same instance until [`Session::set_current`].
    pub fn current(&self) -> UserResult<SharedUser> {
        let mut slot = self.slot();
        if let Some((_, user)) = slot.as_ref() {
            return Ok(Arc::clone(user));
        }

        let user = match self.context.load()? {
            Some(user) => user,
            None => {
                debug!("No stored user, starting anonymous");
                User::new()
            }
        };

        let instance = user.instance_id();
        let shared = Arc::new(tokio::sync::Mutex::new(user));
        *slot = Some((instance, Arc::clone(&shared)));
        Ok(shared)
    }

    /// Persist `user` and make it the current user.
    pub fn set_current(&self, user: User) -> UserResult<SharedUser> {
        self.context.store(&user)?;
        info!("Current user is now {user}");

        let instance = user.instance_id();
        let shared = Arc::new(tokio::sync::Mutex::new(user));
        *self.slot() = Some((instance, Arc::clone(&shared)));
        Ok(shared)
    }

    pub fn is_current(&self, user: &User) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|(instance, _)| *instance == user.instance_id())
    }

    /// Copy custom data from the legacy snapshot into the current user once.
    ///
    /// Only the in-memory user changes; save it to persist. Returns whether
    /// anything was migrated.
    pub async fn migrate(&self) -> UserResult<bool> {
        let Some(legacy) = self.context.raw_legacy_data()? else {
            return Ok(false);
        };

        let already_migrated = legacy
            .get(MIGRATED_FLAG)
            .is_some_and(|flag| UserValue::from(flag.clone()).is_truthy());
        if already_migrated {
            return Ok(false);
        }

        let legacy_data = UserData::from_storage(
            legacy.pointer("/data/data").unwrap_or(&Value::Null),
            &self.registry,
        );

        let current = self.current()?;
        let mut user = current.lock().await;
        for (key, value) in legacy_data.iter() {
            user.set(key.clone(), value.clone());
        }
        user.set(MIGRATED_FLAG, true);

        info!("Migrated {} legacy field(s) into {user}", legacy_data.len());
        Ok(true)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// The app returned to the foreground; emits `app:resume`.
    pub fn resume(&self) {
        self.events.emit(EVENT_APP_RESUME, &Value::Null);
    }

    /// Parse a push plugin notification and emit `push:notification`.
    pub fn handle_push(&self, raw: Value) -> PushMessage {
        let message = PushMessage::from_plugin_json(raw);
        debug!("Received {message}");

        let payload = serde_json::to_value(&message).unwrap_or(Value::Null);
        self.events
            .emit(EVENT_PUSH_NOTIFICATION, &json!({ "message": payload }));
        message
    }

    /// Cancel every outstanding load/save/delete.
    pub fn cancel_all(&self) -> usize {
        self.in_flight.cancel_all()
    }

    fn slot(&self) -> MutexGuard<'_, Option<(Uuid, SharedUser)>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.client.base_url)
            .field("key", &self.context.key())
            .field("authenticated", &self.is_authenticated())
            .field("in_flight", &self.in_flight.len())
            .field("insights_pending", &self.insights.pending())
            .finish_non_exhaustive()
    }
}
