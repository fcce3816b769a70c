//! Connector seam and the reqwest-based HTTP transport.
//!
//! The executor only knows the [`Connector`] trait: execute a query document
//! with a variable payload, get back a [`QueryResponse`]. Cancellation,
//! timeouts, and retries on transient transport failure all live behind this
//! seam.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GraphqlError, QueryError};
use crate::retry::{RetryDecision, RetryPolicy};

/// One GraphQL response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Response data.
    #[serde(default)]
    pub data: Option<Value>,
    /// GraphQL errors.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
    /// Extensions payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl QueryResponse {
    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Executes a rendered query document against a server.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Execute one round trip.
    async fn execute(
        &self,
        query: &str,
        variables: Map<String, Value>,
    ) -> Result<QueryResponse, QueryError>;
}

/// HTTP connector metrics.
#[derive(Debug, Default)]
pub struct ConnectorMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
    requests_retried: AtomicU64,
}

impl ConnectorMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> ConnectorMetricsSnapshot {
        ConnectorMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
            requests_retried: self.requests_retried.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorMetricsSnapshot {
    /// Total requests.
    pub requests_total: u64,
    /// Successful requests.
    pub requests_success: u64,
    /// Failed requests.
    pub requests_error: u64,
    /// Retries performed.
    pub requests_retried: u64,
}

/// HTTP connector configuration.
#[derive(Debug, Clone)]
pub struct HttpConnectorConfig {
    /// Default headers applied to every request.
    pub headers: HeaderMap,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl Default for HttpConnectorConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            headers,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP connector builder.
#[derive(Debug, Clone)]
pub struct HttpConnectorBuilder {
    endpoint: String,
    config: HttpConnectorConfig,
}

impl HttpConnectorBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: HttpConnectorConfig::default(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Add a bearer token header.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        if let Ok(header) = HeaderValue::from_str(&value) {
            self.config
                .headers
                .insert(reqwest::header::AUTHORIZATION, header);
        }
        self
    }

    /// Set timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Build the connector.
    pub fn build(self) -> Result<HttpConnector, QueryError> {
        HttpConnector::with_config(self.endpoint, self.config)
    }
}

/// HTTP connector posting `{query, variables}` bodies.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    endpoint: String,
    http: reqwest::Client,
    config: HttpConnectorConfig,
    metrics: Arc<ConnectorMetrics>,
}

impl HttpConnector {
    /// Create a connector with custom configuration.
    pub fn with_config(
        endpoint: impl Into<String>,
        config: HttpConnectorConfig,
    ) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .default_headers(config.headers.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
            config,
            metrics: Arc::new(ConnectorMetrics::default()),
        })
    }

    /// Return connector metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> ConnectorMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn send_with_retry(&self, body_bytes: Vec<u8>) -> Result<Vec<u8>, QueryError> {
        let mut attempt = 1;
        loop {
            let result = self.send_once(&body_bytes).await;
            match result {
                Ok(bytes) => return Ok(bytes),
                Err(err) => {
                    let decision = self.config.retry.decide(&err, attempt);
                    match decision {
                        RetryDecision::RetryAfter(delay) => {
                            self.metrics
                                .requests_retried
                                .fetch_add(1, Ordering::Relaxed);
                            debug!("retrying query request after {:?}", delay);
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        RetryDecision::DoNotRetry => return Err(err),
                    }
                }
            }
        }
    }

    async fn send_once(&self, body_bytes: &[u8]) -> Result<Vec<u8>, QueryError> {
        let response = self
            .http
            .post(&self.endpoint)
            .body(body_bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = truncate_body(&bytes);
            self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
            return Err(QueryError::HttpStatus {
                status,
                body,
                retry_after,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn execute(
        &self,
        query: &str,
        variables: Map<String, Value>,
    ) -> Result<QueryResponse, QueryError> {
        let mut body = Map::new();
        body.insert("query".to_string(), Value::String(query.to_string()));
        body.insert("variables".to_string(), Value::Object(variables));
        let body_bytes = serde_json::to_vec(&Value::Object(body))?;

        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        let bytes = self.send_with_retry(body_bytes).await?;
        let response: QueryResponse = serde_json::from_slice(&bytes)?;

        if response.errors.is_empty() {
            self.metrics
                .requests_success
                .fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        Ok(response)
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(RETRY_AFTER)?;
    let value = header.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    None
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        // Walk back so the cut never lands inside a multi-byte character.
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies_intact() {
        assert_eq!(truncate_body(b"not found"), "not found");
    }

    #[test]
    fn truncate_body_cuts_long_bodies_on_char_boundary() {
        // 2000 three-byte characters; 4096 is not a multiple of three, so a
        // naive byte-length cut would land mid-character.
        let body = "€".repeat(2000);
        let truncated = truncate_body(body.as_bytes());
        assert!(truncated.ends_with('…'));
        assert!(truncated.len() <= 4096 + '…'.len_utf8());
        assert!(truncated.trim_end_matches('…').chars().all(|c| c == '€'));
    }
}
