//! Router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, get_selection, health_check, list_items, liveness, save_selection,
};
use super::security_header::ContentSecurityPolicyLayer;

/// Builds the application router with every route and layer attached.
///
/// Layers, outermost first: content-security-policy, CORS, request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
        .route("/items", get(list_items))
        .route("/selection", get(get_selection).post(save_selection))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(ContentSecurityPolicyLayer::new())
        .with_state(state)
}
