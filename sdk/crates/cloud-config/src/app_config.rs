use crate::{ConfigError, ConfigErrorResult, DEFAULT_API_URL};

use serde::Deserialize;

/// Identity of the application this SDK instance talks for.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application identifier issued by the platform. Scopes local storage.
    pub app_id: String,
    /// Base URL of the platform REST API
    pub api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_url: String::from(DEFAULT_API_URL),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::app(
                "app.app_id is required (set it in config.toml or CLOUD_APP_ID)",
            ));
        }

        // The app id becomes part of a storage key
        if self
            .app_id
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\')
        {
            return Err(ConfigError::app(format!(
                "app.app_id cannot contain whitespace or path separators, got '{}'",
                self.app_id
            )));
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::app(format!(
                "app.api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }

        Ok(())
    }

    /// API base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
