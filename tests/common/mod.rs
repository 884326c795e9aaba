//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every
//! helper.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use catalog_browser::api::{AppState, router};
use catalog_browser::client::{BrowserSession, LocalCatalogClient};
use catalog_browser::domain::{Catalog, DEFAULT_CATALOG_SIZE, ItemId};

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Creates an `AppState` over the full default catalog with an empty store.
pub fn create_test_app_state() -> AppState {
    AppState::in_memory(Catalog::new(DEFAULT_CATALOG_SIZE))
}

/// Creates an `AppState` over the items `1..=size`.
pub fn create_app_state_with_size(size: i64) -> AppState {
    AppState::in_memory(Catalog::new(size))
}

/// Creates an uninitialized session talking to `state` in-process.
pub fn create_session(state: &AppState) -> BrowserSession<LocalCatalogClient> {
    BrowserSession::new(LocalCatalogClient::new(state.clone()))
}

pub fn ids(values: &[i64]) -> Vec<ItemId> {
    values.iter().copied().map(ItemId::new).collect()
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Response parts collected from a oneshot router call.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

/// Sends one request through a fresh router over `state`.
pub async fn send(state: &AppState, request: Request<Body>) -> TestResponse {
    send_to(router(state.clone()), request).await
}

pub async fn send_to(application: Router, request: Request<Body>) -> TestResponse {
    let response = application.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
