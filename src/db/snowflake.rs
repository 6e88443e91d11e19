//! Snowflake REST connection shared by the Cortex clients.
//!
//! One [`SnowflakeConnection`] is built at startup and handed to both the
//! Cortex Search client and the Cortex Complete client behind an `Arc`. It
//! holds the pooled HTTP client, the account endpoint and the credentials.

use crate::types::{AppError, Result};
use crate::utils::toml_config::{NyayaConfig, SnowflakeConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";

/// Authenticated handle to a Snowflake account's REST API.
pub struct SnowflakeConnection {
    http: reqwest::Client,
    base_url: String,
    account: String,
    user: String,
    role: String,
    warehouse: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for SnowflakeConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeConnection")
            .field("base_url", &self.base_url)
            .field("account", &self.account)
            .field("user", &self.user)
            .field("role", &self.role)
            .field("warehouse", &self.warehouse)
            .finish_non_exhaustive()
    }
}

impl SnowflakeConnection {
    /// Build a connection from the `[snowflake]` section and a resolved token.
    pub fn new(config: &SnowflakeConfig, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| AppError::Configuration("Snowflake token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        let token_type = HeaderValue::from_str(&config.token_type).map_err(|_| {
            AppError::Configuration(format!("Invalid token_type: {}", config.token_type))
        })?;
        headers.insert(TOKEN_TYPE_HEADER, token_type);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(concat!("nyaya/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let connection = Self {
            http,
            base_url: config.base_url(),
            account: config.account.clone(),
            user: config.user.clone(),
            role: config.role.clone(),
            warehouse: config.warehouse.clone(),
            request_timeout: config.request_timeout(),
        };

        info!(
            account = %connection.account,
            user = %connection.user,
            role = %connection.role,
            warehouse = %connection.warehouse,
            "Snowflake connection configured"
        );

        Ok(connection)
    }

    /// Build a connection from the full config, resolving the token from the environment.
    pub fn from_config(config: &NyayaConfig) -> Result<Self> {
        let token = config.snowflake_token()?;
        Self::new(&config.snowflake, &token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn warehouse(&self) -> &str {
        &self.warehouse
    }

    /// POST a JSON body to `path` and decode the JSON response.
    ///
    /// Transport failures, timeouts and non-2xx statuses are reported through
    /// `to_error`, so callers choose between retrieval and generation failures.
    pub async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        to_error: fn(String) -> AppError,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let text = self.post_text(path, body, to_error).await?;
        serde_json::from_str(&text)
            .map_err(|e| to_error(format!("Malformed response from {}: {}", path, e)))
    }

    /// POST a JSON body to `path` and return the raw response text.
    pub async fn post_text<B>(
        &self,
        path: &str,
        body: &B,
        to_error: fn(String) -> AppError,
    ) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| to_error(self.describe_transport_error(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| to_error(self.describe_transport_error(&e)))?;

        if !status.is_success() {
            return Err(to_error(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(&text)
            )));
        }

        Ok(text)
    }

    fn describe_transport_error(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!(
                "request timed out after {}s",
                self.request_timeout.as_secs()
            )
        } else if err.is_connect() {
            format!("could not connect to {}: {}", self.base_url, err)
        } else {
            err.to_string()
        }
    }
}

/// Extracts the `message` field of a Snowflake error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.chars().take(500).collect()
            }
        })
}
