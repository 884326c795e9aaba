//! API module for HTTP handlers.
//!
//! This module contains route definitions, request/response handlers and the
//! response-header middleware.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod security_header;

pub use dto::{DEFAULT_LIMIT, ItemsResponse, ListItemsQuery, SaveStateResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use handlers::{
    AppConfig, AppState, HealthResponse, LIVENESS_MESSAGE, get_selection, health_check,
    list_items, liveness, save_selection,
};
pub use routes::router;
pub use security_header::{CONTENT_SECURITY_POLICY, ContentSecurityPolicyLayer};
