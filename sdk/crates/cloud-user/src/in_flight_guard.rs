use crate::in_flight_registry::InFlightKey;
use crate::{Identity, InFlightRegistry, Operation, UserError, UserResult};

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{Instrument, info_span};

/// Claim on an in-flight registry entry; releases it on drop.
pub struct InFlightGuard {
    registry: InFlightRegistry,
    key: InFlightKey,
    cancel_rx: broadcast::Receiver<()>,
}

impl InFlightGuard {
    pub(crate) fn new(
        registry: InFlightRegistry,
        key: InFlightKey,
        cancel_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            registry,
            key,
            cancel_rx,
        }
    }

    pub fn operation(&self) -> Operation {
        self.key.0
    }

    pub fn identity(&self) -> &Identity {
        &self.key.1
    }

    /// Drive `request` until it completes, `timeout` elapses or the entry is
    /// cancelled. The entry is released when this returns.
    pub async fn run<F, T, E>(mut self, timeout: Duration, request: F) -> UserResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<UserError>,
    {
        let (operation, identity) = self.key.clone();
        let span = info_span!(
            "user_request",
            operation = %operation,
            identity = %identity,
        );

        race(&mut self.cancel_rx, operation, identity, timeout, request)
            .instrument(span)
            .await
    }
}

async fn race<F, T, E>(
    cancel_rx: &mut broadcast::Receiver<()>,
    operation: Operation,
    identity: Identity,
    timeout: Duration,
    request: F,
) -> UserResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<UserError>,
{
    tokio::select! {
        _ = cancel_rx.recv() => Err(UserError::cancelled(operation, identity)),
        result = tokio::time::timeout(timeout, request) => match result {
            Ok(response) => response.map_err(Into::into),
            Err(_elapsed) => Err(UserError::timeout(operation, identity, timeout)),
        },
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}
