use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cloud_client::{Client, ClientResult};
use cloud_config::InsightsConfig;
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Counted whenever the app starts or comes back to the foreground
pub const STAT_APP_OPENED: &str = "mobileapp.opened";
/// Counted when a push notification woke or launched the app
pub const STAT_APP_OPENED_PUSH: &str = "mobileapp.opened.push";

const INSIGHTS_PATH: &str = "/insights";

/// One counted usage statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub app_id: String,
    pub stat: String,
    pub value: u64,
    pub created: DateTime<Utc>,
}

#[derive(Serialize)]
struct Batch<'a> {
    insights: &'a [Stat],
}

/// Batches usage statistics and submits them to the insights endpoint.
///
/// Stats are queued by [`Insights::track`] and sent on a fixed interval, or
/// early once `submit_count` are waiting. Without a running tokio runtime no
/// background submitter exists and the queue is only sent by
/// [`Insights::submit`]. Stats still queued when the tracker is dropped are
/// lost.
pub struct Insights {
    client: Arc<Client>,
    app_id: String,
    config: InsightsConfig,
    batch: Mutex<Vec<Stat>>,
    wake: Arc<Notify>,
    submitter: Mutex<Option<JoinHandle<()>>>,
}

impl Insights {
    pub fn new(client: Arc<Client>, app_id: &str, config: InsightsConfig) -> Arc<Self> {
        Arc::new(Self {
            client,
            app_id: app_id.to_string(),
            config,
            batch: Mutex::new(Vec::new()),
            wake: Arc::new(Notify::new()),
            submitter: Mutex::new(None),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Spawn the background submitter on the current runtime.
    ///
    /// Returns whether a submitter is running afterwards.
    pub fn start(self: &Arc<Self>) -> bool {
        if !self.config.enabled {
            return false;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No tokio runtime, insights are submitted on demand only");
            return false;
        };

        let mut submitter = self.submitter();
        if submitter.is_none() {
            let period = self.config.interval();
            *submitter = Some(runtime.spawn(run_submitter(
                Arc::downgrade(self),
                Arc::clone(&self.wake),
                period,
            )));
            debug!("Insights submitter started (every {}s)", period.as_secs());
        }
        true
    }

    /// Count one occurrence of `stat`.
    pub fn track(&self, stat: &str) {
        self.track_value(stat, 1);
    }

    pub fn track_value(&self, stat: &str, value: u64) {
        if !self.config.enabled {
            return;
        }

        let pending = {
            let mut batch = self.batch();
            batch.push(Stat {
                app_id: self.app_id.clone(),
                stat: stat.to_string(),
                value,
                created: Utc::now(),
            });
            batch.len()
        };

        debug!("Tracked insight '{stat}' ({pending} pending)");
        if pending >= self.config.submit_count {
            self.wake.notify_one();
        }
    }

    /// Number of stats waiting to be submitted
    pub fn pending(&self) -> usize {
        self.batch().len()
    }

    /// Copy of the queued stats, oldest first
    pub fn queued(&self) -> Vec<Stat> {
        self.batch().clone()
    }

    /// Send every queued stat in one request, returns how many were sent.
    ///
    /// On failure the stats go back to the front of the queue for the next
    /// attempt.
    pub async fn submit(&self) -> ClientResult<usize> {
        let stats = std::mem::take(&mut *self.batch());
        if stats.is_empty() {
            return Ok(0);
        }

        let result = match serde_json::to_value(Batch { insights: &stats }) {
            Ok(body) => self
                .client
                .post(INSIGHTS_PATH, Some(&body))
                .await
                .map(|_| stats.len()),
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(count) => debug!("Submitted {count} insight(s)"),
            Err(e) => {
                warn!("Insights submission failed, {} stat(s) requeued: {e}", stats.len());
                self.requeue(stats);
            }
        }
        result
    }

    fn requeue(&self, mut stats: Vec<Stat>) {
        let mut batch = self.batch();
        stats.append(&mut *batch);
        *batch = stats;
    }

    fn batch(&self) -> MutexGuard<'_, Vec<Stat>> {
        self.batch.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn submitter(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.submitter.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Insights {
    fn drop(&mut self) {
        let submitter = self
            .submitter
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = submitter {
            task.abort();
        }
    }
}

impl fmt::Debug for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Insights")
            .field("app_id", &self.app_id)
            .field("enabled", &self.config.enabled)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Submit on every tick, or early when woken by a full batch. Exits once the
/// tracker is gone.
async fn run_submitter(insights: Weak<Insights>, wake: Arc<Notify>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wake.notified() => {}
        }

        let Some(insights) = insights.upgrade() else {
            break;
        };
        // Errors are logged and the stats requeued by submit()
        let _ = insights.submit().await;
    }
}
