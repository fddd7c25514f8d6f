use std::time::Duration;

use super::http::HttpResponse;

/// Result type returned by every public client operation
pub type ApiResult<T> = Result<T, ApiError>;

/// IGDB client errors
///
/// Causes are kept as rendered strings so one failed token fetch can be
/// handed to every caller that was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Upstream error {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ApiError {
    pub(crate) fn network(err: &anyhow::Error) -> Self {
        Self::Network(format!("{err:#}"))
    }

    pub(crate) fn decode(err: &anyhow::Error) -> Self {
        Self::Decode(format!("{err:#}"))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Classifies a non-success response
    pub(crate) fn from_response(response: &HttpResponse) -> Self {
        if response.is_unauthorized() {
            Self::Unauthorized
        } else if response.is_rate_limited() {
            Self::RateLimited {
                retry_after: response.retry_after(),
            }
        } else {
            Self::UpstreamStatus {
                status: response.status,
                body: response.body.clone(),
            }
        }
    }

    /// Returns true for failures that may succeed if the same call is repeated
    ///
    /// `Unauthorized` is not included; it needs a fresh token first.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } => true,
            Self::UpstreamStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns the server's retry hint, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
