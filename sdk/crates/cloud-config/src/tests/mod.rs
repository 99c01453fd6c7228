
use std::env;

use tempfile::TempDir;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Every CLOUD_* override the loader reads; cleared so the host env can't leak in.
const OVERRIDE_KEYS: [&str; 12] = [
    "CLOUD_APP_ID",
    "CLOUD_API_URL",
    "CLOUD_AUTH_TOKEN",
    "CLOUD_STORAGE_BACKEND",
    "CLOUD_STORAGE_DIR",
    "CLOUD_REQUEST_TIMEOUT_SECS",
    "CLOUD_INSIGHTS_ENABLED",
    "CLOUD_INSIGHTS_INTERVAL_SECS",
    "CLOUD_INSIGHTS_SUBMIT_COUNT",
    "CLOUD_LOG_LEVEL",
    "CLOUD_LOG_COLORED",
    "CLOUD_LOG_FILE",
];

/// Create a temp config directory, set CLOUD_CONFIG_DIR and clear overrides
pub(crate) fn setup_config_dir() -> (TempDir, Vec<EnvGuard>) {
    let temp = TempDir::new().unwrap();
    let mut guards = vec![EnvGuard::set(
        "CLOUD_CONFIG_DIR",
        temp.path().to_str().unwrap(),
    )];
    guards.extend(OVERRIDE_KEYS.iter().map(|key| EnvGuard::remove(key)));
    (temp, guards)
}
