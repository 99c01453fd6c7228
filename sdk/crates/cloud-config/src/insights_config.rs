use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_INSIGHTS_INTERVAL_SECS, DEFAULT_INSIGHTS_SUBMIT_COUNT,
    MAX_INSIGHTS_INTERVAL_SECS, MAX_INSIGHTS_SUBMIT_COUNT, MIN_INSIGHTS_INTERVAL_SECS,
};

use std::time::Duration;

use serde::Deserialize;

/// Usage statistics batching.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub enabled: bool,
    /// Seconds between background submissions
    pub interval_secs: u64,
    /// Queue length that triggers an early submission
    pub submit_count: usize,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_INSIGHTS_INTERVAL_SECS,
            submit_count: DEFAULT_INSIGHTS_SUBMIT_COUNT,
        }
    }
}

impl InsightsConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.interval_secs < MIN_INSIGHTS_INTERVAL_SECS
            || self.interval_secs > MAX_INSIGHTS_INTERVAL_SECS
        {
            return Err(ConfigError::insights(format!(
                "insights.interval_secs must be {}-{}, got {}",
                MIN_INSIGHTS_INTERVAL_SECS, MAX_INSIGHTS_INTERVAL_SECS, self.interval_secs
            )));
        }

        if self.submit_count == 0 || self.submit_count > MAX_INSIGHTS_SUBMIT_COUNT {
            return Err(ConfigError::insights(format!(
                "insights.submit_count must be 1-{}, got {}",
                MAX_INSIGHTS_SUBMIT_COUNT, self.submit_count
            )));
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
