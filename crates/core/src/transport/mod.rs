//! HTTP transport abstraction for source-API fetches.
//!
//! The aggregator talks to sources through the [`Transport`] trait so
//! tests can substitute canned responses (see `crate::testing`). The
//! production implementation wraps `reqwest` and carries the timeout,
//! TLS, proxy and header settings from [`FetcherConfig`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::FetcherConfig;

/// The body and status of one source-API response.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// Per-source fetch failures. Each is logged and the source skipped;
/// none of these aborts the overall search.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Empty response body")]
    EmptyBody,

    #[error("Transport error: {0}")]
    Other(String),
}

/// A thing that can fetch a URL and hand back body + status.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`. A `FetchResponse` is only returned for HTTP 200
    /// with a non-empty body; everything else is a [`FetchError`].
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client from the fetcher configuration. Headers that
    /// are not valid HTTP header name/value pairs are skipped.
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid custom header"),
            }
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(!config.verify_tls)
            .default_headers(headers);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_connect() {
                FetchError::Connection(e.to_string())
            } else {
                FetchError::Other(e.to_string())
            }
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Other(e.to_string())
            }
        })?;

        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}
