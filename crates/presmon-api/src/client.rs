//! HTTP client for the sentiment backend.
//!
//! Wraps `reqwest` with bearer-token auth, envelope unwrapping and optional
//! retry. Listing endpoints decode each row independently and skip rows that
//! do not deserialize.

use std::time::Duration;

use presmon_core::AppConfig;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::retry::retry_with_backoff;
use crate::types::{
    value_as_string, EmailConfig, Envelope, MediaSourceKind, RawMediaSource, RawMention,
    RawPolicyImpact, SentimentFeedback, Target, TriggerRunRequest, WriteAck,
};

/// Keys under which some backend versions nest listing rows inside `data`.
const NESTED_ROW_KEYS: &[&str] = &["items", "results", "records", "sources", "mentions"];

/// Connection settings for [`ApiClient`].
#[derive(Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl ApiClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }

    /// Single-attempt settings pointed at `base_url`, with no token.
    #[must_use]
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            token: None,
            timeout_secs: 30,
            user_agent: "presmon/0.1 (sentiment-monitor)".to_string(),
            max_retries: 0,
            retry_backoff_base_ms: 1_000,
        }
    }
}

impl std::fmt::Debug for ApiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}

/// Client for the sentiment backend REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client from the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(config: &ApiClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        // A trailing slash makes `Url::join` append endpoint paths instead of
        // replacing the last segment of the base path.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    /// Single-attempt client without a token (for tests against wiremock).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(&ApiClientConfig::for_base_url(base_url))
    }

    /// Fetches the latest analyzed mentions from `GET /latest-data`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Backend`] if the envelope reports failure.
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the body is not JSON or `data` is not a list.
    pub async fn latest_data(&self) -> Result<Vec<RawMention>, ApiError> {
        self.get_rows("latest-data").await
    }

    /// Fetches one media-source listing from `GET /media-sources/{kind}`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::latest_data`].
    pub async fn media_sources(
        &self,
        kind: MediaSourceKind,
    ) -> Result<Vec<RawMediaSource>, ApiError> {
        self.get_rows(&format!("media-sources/{}", kind.path_segment()))
            .await
    }

    /// Fetches per-policy sentiment impact from `GET /policy-impact`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::latest_data`].
    pub async fn policy_impact(&self) -> Result<Vec<RawPolicyImpact>, ApiError> {
        self.get_rows("policy-impact").await
    }

    /// Submits an analyst's label correction to `POST /sentiment-feedback`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Backend`] if the envelope reports failure.
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    pub async fn send_feedback(&self, feedback: &SentimentFeedback) -> Result<WriteAck, ApiError> {
        self.post("sentiment-feedback", feedback).await
    }

    /// Updates scheduled report delivery via `POST /email/config`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send_feedback`].
    pub async fn configure_email(&self, config: &EmailConfig) -> Result<WriteAck, ApiError> {
        self.post("email/config", config).await
    }

    /// Sets the monitored individual via `POST /target`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send_feedback`].
    pub async fn set_target(&self, target: &Target) -> Result<WriteAck, ApiError> {
        self.post("target", target).await
    }

    /// Asks the collection agent to start a run via `POST /agent/trigger-run`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send_feedback`].
    pub async fn trigger_agent_run(
        &self,
        request: &TriggerRunRequest,
    ) -> Result<WriteAck, ApiError> {
        self.post("agent/trigger-run", request).await
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn get_rows<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(path)?;
        let body = self.request_json(Method::GET, &url, None).await?;
        let rows = extract_rows(body, url.as_str())?;

        let total = rows.len();
        let decoded: Vec<T> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<T>(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::debug!(endpoint = path, error = %e, "skipping undecodable row");
                    None
                }
            })
            .collect();

        if decoded.len() < total {
            tracing::warn!(
                endpoint = path,
                skipped = total - decoded.len(),
                total,
                "some rows could not be decoded"
            );
        }
        Ok(decoded)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<WriteAck, ApiError> {
        let url = self.endpoint(path)?;
        let payload = serde_json::to_value(body).map_err(|e| ApiError::Deserialize {
            context: format!("encode body for {path}"),
            source: e,
        })?;
        let response = self.request_json(Method::POST, &url, Some(&payload)).await?;
        let envelope = parse_envelope(response, url.as_str())?;

        Ok(WriteAck {
            status: envelope
                .status
                .as_ref()
                .and_then(value_as_string)
                .unwrap_or_else(|| "ok".to_string()),
            message: envelope.message.as_ref().and_then(value_as_string),
            data: envelope.data,
        })
    }

    /// Sends a request (with retry), asserts a 2xx status and parses the body
    /// as JSON. An empty body parses as `null`.
    async fn request_json(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, move || {
            self.send_once(method.clone(), url, body)
        })
        .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let mut request = self.client.request(method, url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?.error_for_status()?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Interprets a response body as an envelope; a bare array is treated as
/// the `data` of a successful envelope.
fn parse_envelope(body: Value, context: &str) -> Result<Envelope, ApiError> {
    let envelope = match body {
        Value::Null => Envelope {
            status: None,
            data: None,
            message: None,
            error: None,
        },
        Value::Array(_) => Envelope {
            status: None,
            data: Some(body),
            message: None,
            error: None,
        },
        other => serde_json::from_value::<Envelope>(other).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })?,
    };

    if let Some(message) = envelope.failure_message() {
        return Err(ApiError::Backend(message));
    }
    Ok(envelope)
}

fn extract_rows(body: Value, context: &str) -> Result<Vec<Value>, ApiError> {
    let envelope = parse_envelope(body, context)?;
    match envelope.data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => Ok(rows),
        Some(Value::Object(mut map)) => {
            let nested = NESTED_ROW_KEYS
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(rows)) => Some(rows),
                    _ => None,
                });
            nested.ok_or_else(|| ApiError::Deserialize {
                context: context.to_string(),
                source: serde::de::Error::custom("expected `data` to be a list of rows"),
            })
        }
        Some(_) => Err(ApiError::Deserialize {
            context: context.to_string(),
            source: serde::de::Error::custom("expected `data` to be a list of rows"),
        }),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
