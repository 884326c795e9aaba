//! HTTP handlers for the catalog service.
//!
//! # Endpoints
//!
//! - `GET /items` - List a page of items (range, filter, explicit ids, exclusions)
//! - `POST /selection` - Store selection and order for a search key
//! - `GET /selection` - Read the state of the active search
//! - `GET /` - Plain-text liveness check
//! - `GET /health` - JSON health check

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};

use super::dto::{DEFAULT_LIMIT, ItemsResponse, ListItemsQuery, SaveStateResponse};
use super::error::ApiErrorResponse;
use crate::domain::{Catalog, ViewState};
use crate::infrastructure::{InMemoryStateRepository, StateRepository};

// =============================================================================
// Application Configuration
// =============================================================================

/// Runtime settings shared by the handlers.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Page size used when a request carries no usable `limit`.
    pub default_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The store is a trait object so another backend can be swapped in without
/// touching the handlers.
#[derive(Clone)]
pub struct AppState {
    /// The virtual item range.
    pub catalog: Catalog,
    /// Selection/order store keyed by search string.
    pub state_repository: Arc<dyn StateRepository + Send + Sync>,
    pub config: AppConfig,
}

impl AppState {
    /// Creates state backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory(catalog: Catalog) -> Self {
        Self {
            catalog,
            state_repository: Arc::new(InMemoryStateRepository::new()),
            config: AppConfig::default(),
        }
    }
}

// =============================================================================
// GET /items Handler
// =============================================================================

/// Lists one page of items.
///
/// # Query Parameters
///
/// - `search`: substring filter on the decimal representation
/// - `limit`: page size (default: 20)
/// - `offset`: window start (default: 0; ignored when `exclude` is present)
/// - `ids`: comma-separated explicit ids; overrides everything else
/// - `exclude`: comma-separated ids to leave out
///
/// # Response
///
/// ```json
/// { "items": [1, 2, 3], "total": 1000000 }
/// ```
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] (500) only if the state store fails while
/// reading the stored order.
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ItemsResponse>, ApiErrorResponse> {
    let request = query.to_request(state.config.default_limit);

    let stored_order = if request.uses_stored_order() {
        state.state_repository.find_order(&query.search).await?
    } else {
        Vec::new()
    };

    let page = state.catalog.list(&request, &stored_order);

    tracing::debug!(
        search = %query.search,
        limit = request.window.limit,
        offset = request.window.offset,
        stored_order = stored_order.len(),
        returned = page.items.len(),
        total = page.total,
        "Listed items"
    );

    Ok(Json(ItemsResponse {
        items: page.items,
        total: page.total,
    }))
}

// =============================================================================
// /selection Handlers
// =============================================================================

/// Stores selection and order for `search` and makes it the active search.
///
/// Missing fields default to empty lists / the empty search key. Ids are
/// stored as received.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] if the body is not valid JSON (4xx) or the
/// store fails (500).
pub async fn save_selection(
    State(state): State<AppState>,
    payload: Result<Json<ViewState>, JsonRejection>,
) -> Result<Json<SaveStateResponse>, ApiErrorResponse> {
    let Json(view_state) = payload?;

    tracing::debug!(
        search = %view_state.search,
        selection = view_state.selection.len(),
        order = view_state.order.len(),
        "Saving selection"
    );

    state.state_repository.save(view_state).await?;

    Ok(Json(SaveStateResponse::ok()))
}

/// Returns selection and order of the active search.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] (500) if the store fails.
pub async fn get_selection(
    State(state): State<AppState>,
) -> Result<Json<ViewState>, ApiErrorResponse> {
    let view_state = state.state_repository.load_active().await?;
    Ok(Json(view_state))
}

// =============================================================================
// Liveness / Health
// =============================================================================

/// Body of the plain-text liveness check.
pub const LIVENESS_MESSAGE: &str = "API is running";

/// Plain-text liveness check served at `/`.
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// ```json
/// { "status": "healthy", "version": "0.1.0" }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================
