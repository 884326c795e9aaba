//! Catalog Browser
//!
//! A paginated, searchable, reorderable, multi-select browser over a catalog
//! of integer items.
//!
//! - [`domain`]: items, filters, the catalog listing and the stored view state
//! - [`infrastructure`]: the view-state store and service configuration
//! - [`api`]: axum handlers, DTOs and the router of the catalog service
//! - [`client`]: the browser session and its transports

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
