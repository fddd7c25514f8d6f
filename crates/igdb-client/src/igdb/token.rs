//! Twitch app access token cache
//!
//! IGDB authenticates with a Twitch app token from the client-credentials
//! grant. One `TokenManager` is shared by every `ApiClient` in the process.
//!
//! State transitions:
//!
//! ```text
//! NoToken --get--> Fetching --ok--> Valid --(expiry - margin)--> Fetching ...
//!                     \--err/timeout--> NoToken
//! ```
//!
//! The first caller that finds no usable token spawns the fetch and parks a
//! `watch` receiver in the state. Everyone else who arrives while it runs
//! waits on that receiver, so there is never more than one token request in
//! flight. The fetch runs on its own task: a waiter that gives up does not
//! cancel it.

use chrono::{DateTime, Duration, Utc};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use super::error::{ApiError, ApiResult};
use super::http::{HttpClient, ReqwestClient};
use crate::config::{ConfigError, Credentials, IgdbConfig};
use crate::time::{Clock, SystemClock};

/// Cached app access token
#[derive(Clone)]
struct Token {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Usable without a network call until `margin` before the real expiry
    fn is_fresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now < self.expires_at - margin
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Response from the token endpoint
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

type FetchOutcome = Option<ApiResult<String>>;

#[derive(Debug)]
enum TokenState {
    NoToken,
    Fetching(watch::Receiver<FetchOutcome>),
    Valid(Token),
}

struct Inner<H, C> {
    http: H,
    clock: C,
    credentials: Credentials,
    token_url: String,
    safety_margin: Duration,
    fetch_timeout: std::time::Duration,
    state: Mutex<TokenState>,
}

/// Shared token cache with single-flight refresh
///
/// Cloning is cheap and every clone shares the same cache.
pub struct TokenManager<H: HttpClient = ReqwestClient, C: Clock = SystemClock> {
    inner: Arc<Inner<H, C>>,
}

impl<H: HttpClient, C: Clock> Clone for TokenManager<H, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl TokenManager<ReqwestClient, SystemClock> {
    /// Creates a token manager with the default HTTP client and system clock
    pub fn new(config: &IgdbConfig) -> Result<Self, ConfigError> {
        Self::with_http_client(config, ReqwestClient::new(), SystemClock)
    }
}

impl<H, C> TokenManager<H, C>
where
    H: HttpClient + 'static,
    C: Clock + 'static,
{
    /// Creates a token manager with a custom HTTP implementation and clock
    pub fn with_http_client(config: &IgdbConfig, http: H, clock: C) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                clock,
                credentials: config.credentials()?,
                token_url: config.token_url.clone(),
                safety_margin: config.safety_margin()?,
                fetch_timeout: config.token_timeout(),
                state: Mutex::new(TokenState::NoToken),
            }),
        })
    }

    /// Returns the client id the tokens are issued for
    pub fn client_id(&self) -> &str {
        &self.inner.credentials.client_id
    }

    /// Returns a usable access token, fetching one if needed
    ///
    /// Concurrent callers share a single in-flight fetch. Failures are not
    /// cached; the next call starts a fresh attempt.
    pub async fn get_valid_token(&self) -> ApiResult<String> {
        let mut pending = {
            let mut state = self.inner.state.lock().await;
            match &*state {
                TokenState::Valid(token)
                    if token.is_fresh(self.inner.clock.now(), self.inner.safety_margin) =>
                {
                    tracing::debug!("Using cached IGDB token");
                    return Ok(token.access_token.clone());
                }
                TokenState::Fetching(rx) => {
                    tracing::debug!("Token fetch already in flight, waiting on it");
                    rx.clone()
                }
                TokenState::NoToken | TokenState::Valid(_) => {
                    let (tx, rx) = watch::channel(None);
                    *state = TokenState::Fetching(rx.clone());
                    let inner = self.inner.clone();
                    tokio::spawn(async move { inner.run_fetch(tx).await });
                    rx
                }
            }
        };

        let outcome = pending
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|outcome| outcome.clone());

        match outcome {
            Some(result) => result,
            None => {
                // The fetch task went away without reporting
                let mut state = self.inner.state.lock().await;
                if matches!(&*state, TokenState::Fetching(rx) if rx.same_channel(&pending)) {
                    *state = TokenState::NoToken;
                }
                Err(ApiError::Network("token fetch abandoned".to_string()))
            }
        }
    }

    /// Drops the cached token if it is still the one that was rejected
    ///
    /// A token that a concurrent refresh already replaced is kept, and an
    /// in-flight fetch is never interrupted.
    pub async fn invalidate(&self, rejected: &str) {
        let mut state = self.inner.state.lock().await;
        if matches!(&*state, TokenState::Valid(token) if token.access_token == rejected) {
            tracing::info!("Discarding rejected IGDB token");
            *state = TokenState::NoToken;
        }
    }

    /// Returns true if a token is cached and not inside the safety margin
    pub async fn has_valid_token(&self) -> bool {
        let state = self.inner.state.lock().await;
        matches!(&*state, TokenState::Valid(token)
            if token.is_fresh(self.inner.clock.now(), self.inner.safety_margin))
    }
}

impl<H: HttpClient, C: Clock> Inner<H, C> {
    async fn run_fetch(self: Arc<Self>, tx: watch::Sender<FetchOutcome>) {
        tracing::info!("Requesting new IGDB app token");

        let result = match tokio::time::timeout(self.fetch_timeout, self.fetch_token()).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Network(format!(
                "token request timed out after {}s",
                self.fetch_timeout.as_secs()
            ))),
        };

        {
            let mut state = self.state.lock().await;
            *state = match &result {
                Ok(token) => {
                    tracing::info!("IGDB app token valid until {}", token.expires_at);
                    TokenState::Valid(token.clone())
                }
                Err(e) => {
                    tracing::warn!("IGDB token request failed: {}", e);
                    TokenState::NoToken
                }
            };
        }

        // Nobody left waiting is fine; the state above is what matters
        let _ = tx.send(Some(result.map(|token| token.access_token)));
    }

    /// Performs the client-credentials grant
    async fn fetch_token(&self) -> ApiResult<Token> {
        let url = format!(
            "{}?client_id={}&client_secret={}&grant_type=client_credentials",
            self.token_url,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.client_secret),
        );

        let response = self
            .http
            .post(&url, &HeaderMap::new(), String::new())
            .await
            .map_err(|e| ApiError::network(&e))?;

        // Twitch answers bad client credentials with 400 or 403
        if matches!(response.status, 400 | 401 | 403) {
            return Err(ApiError::Unauthorized);
        }

        if !response.is_success() {
            return Err(ApiError::from_response(&response));
        }

        let tr: TokenResponse = response.json().map_err(|e| ApiError::decode(&e))?;

        if tr.access_token.is_empty() {
            return Err(ApiError::Decode("token response has empty access_token".into()));
        }
        if tr.expires_in <= 0 {
            return Err(ApiError::Decode(format!(
                "token response has non-positive expires_in {}",
                tr.expires_in
            )));
        }

        let expires_at = Duration::try_seconds(tr.expires_in)
            .and_then(|lifetime| self.clock.now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                ApiError::Decode(format!(
                    "token response expires_in {} out of range",
                    tr.expires_in
                ))
            })?;

        Ok(Token {
            access_token: tr.access_token,
            expires_at,
        })
    }
}
