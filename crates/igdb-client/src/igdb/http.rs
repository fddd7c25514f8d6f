//! HTTP client abstraction for the token and metadata endpoints
//!
//! Both endpoints are plain POSTs, so the trait only needs one method. It is
//! easy to mock and keeps reqwest out of the token and request logic.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Trait for making HTTP requests
///
/// Implementations return `Err` only when no response was received.
/// Any status code, including 4xx/5xx, comes back as an `HttpResponse`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Makes a POST request and returns the raw response
    async fn post(&self, url: &str, headers: &HeaderMap, body: String) -> Result<HttpResponse>;
}

/// Response from an HTTP request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    /// Returns true if status is in 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the credentials or token were rejected (401 or 403)
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// Returns true if status is 429
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Parses a delta-seconds `Retry-After` header
    pub fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Failed to parse JSON response")
    }
}

/// Production HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new reqwest-based HTTP client
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, url: &str, headers: &HeaderMap, body: String) -> Result<HttpResponse> {
        let response = self
            .inner
            .post(url)
            .headers(headers.clone())
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
