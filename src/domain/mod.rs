//! Domain module for the catalog browser.
//!
//! This module contains the item model, the listing rules of the catalog,
//! and the per-search view state.

pub mod catalog;
pub mod item;
pub mod view_state;

pub use catalog::{Catalog, DEFAULT_CATALOG_SIZE, ItemPage, ListRequest, Selector, Window};
pub use item::{Filter, ItemId};
pub use view_state::ViewState;
