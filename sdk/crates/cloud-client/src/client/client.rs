use crate::{ClientError, ClientResult};

use std::sync::RwLock;
use std::time::Duration;

use cloud_config::Config;
use log::debug;
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use serde_json::Value;

/// HTTP client for the platform REST API
pub struct Client {
    pub base_url: String,
    token: RwLock<Option<String>>,
    client: ReqwestClient,
}

impl Client {
    /// Create a new client without a request timeout
    ///
    /// # Arguments
    /// * `base_url` - API URL (e.g., "https://api.ionic.io")
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            client: ReqwestClient::new(),
        }
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            client,
        })
    }

    /// Client for `app.api_url`, with `request.timeout_secs` and `auth.token` applied
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let client = Self::with_timeout(config.app.api_url(), config.request.timeout())?;
        client.set_token(config.auth.token.clone());
        Ok(client)
    }

    /// Replace the bearer token sent with every request
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Build a request with the bearer token, if any
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);

        if let Some(token) = self.token() {
            req = req.bearer_auth(token);
        }

        req
    }

    /// Execute request and handle errors
    ///
    /// Empty bodies read as `Value::Null`.
    async fn execute(&self, req: reqwest::RequestBuilder) -> ClientResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else if status.is_success() {
            serde_json::from_str(&text)?
        } else {
            // Error bodies are not always JSON
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if !status.is_success() {
            return Err(Self::api_error(status, &body));
        }

        Ok(body)
    }

    fn api_error(status: StatusCode, body: &Value) -> ClientError {
        let error = body.get("error");
        let code = error
            .and_then(|e| e.get("code").or_else(|| e.get("type")))
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("UNKNOWN"))
            .to_string();
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .or_else(|| body.as_str().map(String::from))
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));

        ClientError::api_error(status.as_u16(), code, message)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get(&self, path: &str) -> ClientResult<Value> {
        debug!("GET {path}");
        let req = self.request(Method::GET, path);
        self.execute(req).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        debug!("POST {path}");
        let mut req = self.request(Method::POST, path);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.execute(req).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> ClientResult<Value> {
        debug!("PATCH {path}");
        let req = self.request(Method::PATCH, path).json(body);
        self.execute(req).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Value> {
        debug!("DELETE {path}");
        let req = self.request(Method::DELETE, path);
        self.execute(req).await
    }
}
