use crate::{Identity, InFlightGuard, Operation, UserError, UserResult};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use tokio::sync::broadcast;

pub(crate) type InFlightKey = (Operation, Identity);

/// Outstanding remote operations, at most one per (operation, identity).
///
/// Each entry holds a cancellation channel; the entry is released when its
/// [`InFlightGuard`] drops.
#[derive(Clone, Default)]
pub struct InFlightRegistry {
    inner: Arc<Mutex<HashMap<InFlightKey, broadcast::Sender<()>>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `operation` for `identity`.
    ///
    /// Fails immediately with [`UserError::InFlight`] when the same operation
    /// is already running for that identity.
    #[track_caller]
    pub fn begin(&self, operation: Operation, identity: Identity) -> UserResult<InFlightGuard> {
        let mut inner = self.lock();
        let key = (operation, identity);

        if inner.contains_key(&key) {
            let (operation, identity) = key;
            warn!("A {operation} operation is already in progress for {identity}");
            return Err(UserError::in_flight(operation, identity));
        }

        let (cancel_tx, cancel_rx) = broadcast::channel(1);
        inner.insert(key.clone(), cancel_tx);
        debug!("{} started for {} ({} in flight)", key.0, key.1, inner.len());

        Ok(InFlightGuard::new(self.clone(), key, cancel_rx))
    }

    pub fn is_in_flight(&self, operation: Operation, identity: &Identity) -> bool {
        self.lock().contains_key(&(operation, identity.clone()))
    }

    /// Cancel one outstanding operation, returns whether it was running.
    pub fn cancel(&self, operation: Operation, identity: &Identity) -> bool {
        match self.lock().get(&(operation, identity.clone())) {
            Some(cancel_tx) => {
                let _ = cancel_tx.send(());
                debug!("Cancelled {operation} for {identity}");
                true
            }
            None => false,
        }
    }

    /// Cancel everything in flight, returns how many were signalled.
    pub fn cancel_all(&self) -> usize {
        let inner = self.lock();
        for cancel_tx in inner.values() {
            let _ = cancel_tx.send(());
        }
        if !inner.is_empty() {
            debug!("Cancelled {} in-flight operation(s)", inner.len());
        }
        inner.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub(crate) fn release(&self, key: &InFlightKey) {
        if self.lock().remove(key).is_some() {
            debug!("{} finished for {}", key.0, key.1);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<InFlightKey, broadcast::Sender<()>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
