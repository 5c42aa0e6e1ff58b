//! Delivery transport - outbound HTTP delivery attempts
//!
//! The dispatcher depends only on the narrow `Transport` contract, not on a
//! specific HTTP client. `HttpTransport` is the production implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Failure of a single delivery attempt before a response was received.
///
/// A response with a non-2xx status is NOT a transport error; the status
/// code is reported as-is and classification is the caller's concern.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// One outbound delivery attempt: POST the JSON payload to the url and
/// report the response status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, url: &str, payload: &serde_json::Value)
        -> Result<u16, TransportError>;
}

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Total request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP-based delivery transport backed by a pooled reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_config(HttpTransportConfig::default())
    }

    pub fn with_config(config: HttpTransportConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client");

        info!(
            timeout_secs = config.timeout.as_secs(),
            connect_timeout_secs = config.connect_timeout.as_secs(),
            "HttpTransport initialized"
        );

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<u16, TransportError> {
        debug!(url = %url, "Delivering webhook payload");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else if e.is_connect() {
                    TransportError::Connect(e.to_string())
                } else {
                    TransportError::Request(e.to_string())
                }
            })?;

        Ok(response.status().as_u16())
    }
}
