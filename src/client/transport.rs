//! Transport between the browser session and the catalog service.
//!
//! [`CatalogClient`] is the seam: [`HttpCatalogClient`] talks to a running
//! service with `reqwest`, [`LocalCatalogClient`] dispatches straight into the
//! handlers of an in-process [`AppState`].

use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use futures::future::BoxFuture;
use thiserror::Error;

use crate::api::{
    self, ApiErrorResponse, AppState, ItemsResponse, ListItemsQuery, SaveStateResponse,
};
use crate::domain::ViewState;
use crate::infrastructure::ConfigurationError;
use crate::infrastructure::config::read_var;

/// Base URL used when `CATALOG_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

// =============================================================================
// Client Error
// =============================================================================

/// Errors raised while talking to the catalog service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The service could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request exceeded the configured timeout.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// The service answered with a non-success status.
    #[error("Unexpected status: HTTP {0}")]
    UnexpectedStatus(u16),

    /// The response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<ApiErrorResponse> for ClientError {
    fn from(error: ApiErrorResponse) -> Self {
        Self::UnexpectedStatus(error.status.as_u16())
    }
}

// =============================================================================
// Catalog Client Trait
// =============================================================================

/// Operations the browser session needs from the catalog service.
pub trait CatalogClient: Send + Sync {
    /// `GET /items`.
    fn list_items(
        &self,
        query: ListItemsQuery,
    ) -> BoxFuture<'_, Result<ItemsResponse, ClientError>>;

    /// `GET /selection`.
    fn load_state(&self) -> BoxFuture<'_, Result<ViewState, ClientError>>;

    /// `POST /selection`.
    fn save_state(&self, state: ViewState)
    -> BoxFuture<'_, Result<SaveStateResponse, ClientError>>;
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for [`HttpCatalogClient`].
///
/// # Environment Variables
///
/// - `CATALOG_API_URL`: service base URL (default: `http://localhost:3001`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration from `CATALOG_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the URL is not http(s) or not UTF-8.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_value(read_var("CATALOG_API_URL")?.as_deref())
    }

    /// Creates a configuration from a raw `CATALOG_API_URL` value.
    ///
    /// A missing or blank value selects [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidBaseUrl` for a non-http(s) URL.
    pub fn from_value(raw: Option<&str>) -> Result<Self, ConfigurationError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(url) => Self::with_base_url(url),
            None => Ok(Self::default()),
        }
    }

    /// Creates a configuration for `base_url`, trimming trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidBaseUrl` unless the URL starts with
    /// `http://` or `https://`.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigurationError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigurationError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: None,
        })
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// =============================================================================
// HTTP Client
// =============================================================================

/// `reqwest`-backed client for a running catalog service.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpCatalogClient {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn apply_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn send_json<T>(&self, request: reqwest::RequestBuilder) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let timeout_ms = self
            .config
            .timeout
            .map_or(0, |timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));

        let response = self
            .apply_timeout(request)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ClientError::Timeout(timeout_ms)
                } else if error.is_connect() {
                    ClientError::ConnectionFailed(error.to_string())
                } else if error.is_decode() {
                    ClientError::Decode(error.to_string())
                } else {
                    ClientError::ConnectionFailed(error.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|error| ClientError::Decode(error.to_string()))
    }
}

impl CatalogClient for HttpCatalogClient {
    fn list_items(
        &self,
        query: ListItemsQuery,
    ) -> BoxFuture<'_, Result<ItemsResponse, ClientError>> {
        Box::pin(async move {
            tracing::debug!(?query, "GET /items");
            let request = self.client.get(self.url("/items")).query(&query);
            self.send_json(request).await
        })
    }

    fn load_state(&self) -> BoxFuture<'_, Result<ViewState, ClientError>> {
        Box::pin(async move {
            tracing::debug!("GET /selection");
            let request = self.client.get(self.url("/selection"));
            self.send_json(request).await
        })
    }

    fn save_state(
        &self,
        state: ViewState,
    ) -> BoxFuture<'_, Result<SaveStateResponse, ClientError>> {
        Box::pin(async move {
            tracing::debug!(search = %state.search, "POST /selection");
            let request = self.client.post(self.url("/selection")).json(&state);
            self.send_json(request).await
        })
    }
}

// =============================================================================
// In-Process Client
// =============================================================================

/// Client that calls the service handlers directly, without HTTP.
///
/// Useful for embedding the browser session next to the service and for
/// driving the session in tests.
#[derive(Clone)]
pub struct LocalCatalogClient {
    state: AppState,
}

impl LocalCatalogClient {
    #[must_use]
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl CatalogClient for LocalCatalogClient {
    fn list_items(
        &self,
        query: ListItemsQuery,
    ) -> BoxFuture<'_, Result<ItemsResponse, ClientError>> {
        Box::pin(async move {
            let Json(response) = api::list_items(State(self.state.clone()), Query(query)).await?;
            Ok(response)
        })
    }

    fn load_state(&self) -> BoxFuture<'_, Result<ViewState, ClientError>> {
        Box::pin(async move {
            let Json(response) = api::get_selection(State(self.state.clone())).await?;
            Ok(response)
        })
    }

    fn save_state(
        &self,
        state: ViewState,
    ) -> BoxFuture<'_, Result<SaveStateResponse, ClientError>> {
        Box::pin(async move {
            let Json(response) =
                api::save_selection(State(self.state.clone()), Ok(Json(state))).await?;
            Ok(response)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
