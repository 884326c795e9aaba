//! Store trait for per-search view state.
//!
//! All methods return boxed futures so the store can sit behind
//! `Arc<dyn StateRepository>` in the application state.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{ItemId, ViewState};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing storage could not complete the operation.
    #[error("Storage error: {0}")]
    Storage(String),
}

// =============================================================================
// State Repository
// =============================================================================

/// Store for selection and order lists keyed by search string.
///
/// Writes are whole-entry overwrites and the last write wins. The store also
/// tracks the active search, which is the key of the most recent write.
pub trait StateRepository: Send + Sync {
    /// Overwrites the selection and order for `state.search` and makes that
    /// key the active search.
    fn save(&self, state: ViewState) -> BoxFuture<'static, Result<(), RepositoryError>>;

    /// Loads the state stored for the active search.
    ///
    /// Missing lists are reported as empty. Before the first write the active
    /// search is the empty string.
    fn load_active(&self) -> BoxFuture<'static, Result<ViewState, RepositoryError>>;

    /// Loads the order list stored for `search`, empty if none.
    fn find_order(&self, search: &str) -> BoxFuture<'static, Result<Vec<ItemId>, RepositoryError>>;
}
