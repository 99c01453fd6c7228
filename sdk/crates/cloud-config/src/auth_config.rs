use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token used for authenticated user endpoints. Never logged.
    pub token: Option<String>,
}
