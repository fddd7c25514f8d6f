use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiResult};
use super::http::{HttpClient, ReqwestClient};
use super::query::QueryBuilder;
use super::retry::{self, RetryPolicy};
use super::token::TokenManager;
use crate::config::{ConfigError, IgdbConfig};
use crate::time::{Clock, SystemClock};

/// One call against an IGDB resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path below the API base, e.g. `games` or `/games`
    pub resource: String,
    /// Rendered query body
    pub body: String,
}

impl ApiRequest {
    pub fn new(resource: impl Into<String>, query: &QueryBuilder) -> Self {
        Self {
            resource: resource.into(),
            body: query.build(),
        }
    }
}

/// IGDB request executor
///
/// Generic over the HTTP client implementation for testability. The token
/// manager is shared; pass clones of one instance to every client.
pub struct ApiClient<H: HttpClient = ReqwestClient, C: Clock = SystemClock> {
    http: H,
    tokens: TokenManager<H, C>,
    api_base_url: String,
    request_timeout: std::time::Duration,
}

impl ApiClient<ReqwestClient, SystemClock> {
    /// Creates a client with its own token manager
    pub fn from_config(config: &IgdbConfig) -> Result<Self, ConfigError> {
        let tokens = TokenManager::new(config)?;
        Ok(Self::new(config, tokens))
    }

    /// Creates a client around an existing token manager
    pub fn new(config: &IgdbConfig, tokens: TokenManager) -> Self {
        Self::with_http_client(config, tokens, ReqwestClient::new())
    }
}

impl<H, C> ApiClient<H, C>
where
    H: HttpClient + 'static,
    C: Clock + 'static,
{
    /// Creates a client with a custom HTTP implementation
    pub fn with_http_client(config: &IgdbConfig, tokens: TokenManager<H, C>, http: H) -> Self {
        Self {
            http,
            tokens,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
        }
    }

    /// Returns the shared token manager
    pub fn tokens(&self) -> &TokenManager<H, C> {
        &self.tokens
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.api_base_url, resource.trim_start_matches('/'))
    }

    /// Builds the headers for an authenticated request
    fn build_headers(&self, token: &str) -> ApiResult<HeaderMap> {
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::invalid("access token is not a valid header value"))?;
        let client_id = HeaderValue::from_str(self.tokens.client_id())
            .map_err(|_| ApiError::invalid("client id is not a valid header value"))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Client-ID", client_id);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Posts `query` to `resource` and decodes the JSON response
    ///
    /// Makes exactly one HTTP attempt. A 401/403 drops the token that was
    /// used, so the next call fetches a new one, and returns `Unauthorized`.
    pub async fn request<T: DeserializeOwned>(&self, resource: &str, query: &str) -> ApiResult<T> {
        let token = self.tokens.get_valid_token().await?;
        let headers = self.build_headers(&token)?;
        let url = self.resource_url(resource);

        tracing::debug!("POST {}", url);

        let response = tokio::time::timeout(
            self.request_timeout,
            self.http.post(&url, &headers, query.to_string()),
        )
        .await
        .map_err(|_| {
            ApiError::Network(format!(
                "request to {} timed out after {}s",
                url,
                self.request_timeout.as_secs()
            ))
        })?
        .map_err(|e| ApiError::network(&e))?;

        tracing::debug!("{} answered {}", url, response.status);

        if !response.is_success() {
            let err = ApiError::from_response(&response);
            if err == ApiError::Unauthorized {
                self.tokens.invalidate(&token).await;
            }
            tracing::warn!("IGDB request to {} failed: {}", url, err);
            return Err(err);
        }

        response.json().map_err(|e| {
            let err = ApiError::decode(&e);
            tracing::warn!("IGDB response from {} did not decode: {}", url, err);
            err
        })
    }

    /// Executes a prepared request
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        self.request(&request.resource, &request.body).await
    }

    /// Executes a prepared request under a retry policy
    pub async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        policy: &RetryPolicy,
        request: &ApiRequest,
    ) -> ApiResult<T> {
        retry::run(policy, || self.execute(request)).await
    }
}

impl<H: HttpClient + Clone, C: Clock> Clone for ApiClient<H, C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            tokens: self.tokens.clone(),
            api_base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout,
        }
    }
}
