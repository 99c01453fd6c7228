mod app_config;
mod auth_config;
mod config;
mod error;
mod insights_config;
mod log_level;
mod logging_config;
mod request_config;
mod storage_config;

#[cfg(test)]
mod tests;

pub use app_config::AppConfig;
pub use auth_config::AuthConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use insights_config::InsightsConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use request_config::RequestConfig;
pub use storage_config::{StorageBackend, StorageConfig};

const DEFAULT_API_URL: &str = "https://api.ionic.io";
const DEFAULT_STORAGE_DIR: &str = "storage";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;

// Request constraints
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Insights constraints
pub const MIN_INSIGHTS_INTERVAL_SECS: u64 = 1;
pub const MAX_INSIGHTS_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_INSIGHTS_INTERVAL_SECS: u64 = 60;
pub const MAX_INSIGHTS_SUBMIT_COUNT: usize = 1000;
pub const DEFAULT_INSIGHTS_SUBMIT_COUNT: usize = 100;

/// Name of the config directory when `CLOUD_CONFIG_DIR` is unset.
pub const CONFIG_DIR_NAME: &str = ".cloud";
pub const CONFIG_FILE_NAME: &str = "config.toml";
