//! HTTP transport abstraction for talking to the price feed

use crate::{
    config::TickerConfig,
    constants::{REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::FetchError,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Trait for issuing GET requests
///
/// Any status code is a successful exchange at this level; only a missing
/// response (DNS, TLS, timeout) is an error.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;

    /// Returns the name of this transport
    fn transport_name(&self) -> &'static str;
}

/// Transport backed by `reqwest`, with a hard request timeout
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport with the default timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a transport using `config.request_timeout_secs`
    pub fn from_config(config: &TickerConfig) -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    /// Creates a transport that gives up on a request after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        tracing::debug!(url, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}
