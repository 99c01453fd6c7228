use crate::{
    AppConfig, AuthConfig, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    InsightsConfig, LoggingConfig, RequestConfig, StorageConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub request: RequestConfig,
    pub insights: InsightsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for CLOUD_CONFIG_DIR env var, else use ./.cloud/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply CLOUD_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse a config from TOML text. No env overrides are applied.
    pub fn from_toml_str(contents: &str) -> ConfigErrorResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::Toml {
            path: PathBuf::from("<inline>"),
            source: e,
        })
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: CLOUD_CONFIG_DIR env var > ./.cloud/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var("CLOUD_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.app.validate()?;
        self.storage.validate()?;
        self.request.validate()?;
        self.insights.validate()?;

        Ok(())
    }

    /// Absolute path of the file storage directory.
    pub fn storage_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.storage.dir))
    }

    /// Log configuration summary (NEVER logs the auth token).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  app: {} @ {}", self.app.app_id, self.app.api_url());
        info!(
            "  auth: {}",
            if self.auth.token.is_some() {
                "token configured"
            } else {
                "anonymous"
            }
        );
        info!(
            "  storage: {} ({})",
            self.storage.backend, self.storage.dir
        );
        info!("  request: timeout={}s", self.request.timeout_secs);
        info!(
            "  insights: {} (every {}s, batch {})",
            if self.insights.enabled { "on" } else { "off" },
            self.insights.interval_secs,
            self.insights.submit_count
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // App
        Self::apply_env_string("CLOUD_APP_ID", &mut self.app.app_id);
        Self::apply_env_string("CLOUD_API_URL", &mut self.app.api_url);

        // Auth
        Self::apply_env_option_string("CLOUD_AUTH_TOKEN", &mut self.auth.token);

        // Storage
        Self::apply_env_parse("CLOUD_STORAGE_BACKEND", &mut self.storage.backend);
        Self::apply_env_string("CLOUD_STORAGE_DIR", &mut self.storage.dir);

        // Request
        Self::apply_env_parse(
            "CLOUD_REQUEST_TIMEOUT_SECS",
            &mut self.request.timeout_secs,
        );

        // Insights
        Self::apply_env_bool("CLOUD_INSIGHTS_ENABLED", &mut self.insights.enabled);
        Self::apply_env_parse(
            "CLOUD_INSIGHTS_INTERVAL_SECS",
            &mut self.insights.interval_secs,
        );
        Self::apply_env_parse(
            "CLOUD_INSIGHTS_SUBMIT_COUNT",
            &mut self.insights.submit_count,
        );

        // Logging
        Self::apply_env_parse("CLOUD_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("CLOUD_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("CLOUD_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
