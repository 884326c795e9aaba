//! In-memory view-state store.
//!
//! State lives for the process lifetime. A single `tokio::sync::RwLock`
//! serializes writers, so concurrent saves are applied one at a time and the
//! last one wins.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::domain::{ItemId, ViewState};
use crate::infrastructure::{RepositoryError, StateRepository};

/// Lists stored for one search key.
#[derive(Debug, Clone, Default)]
struct StoredLists {
    selection: Vec<ItemId>,
    order: Vec<ItemId>,
}

#[derive(Debug, Default)]
struct StoreData {
    entries: HashMap<String, StoredLists>,
    active_search: String,
}

/// In-memory implementation of `StateRepository`.
///
/// # Example
///
/// ```ignore
/// let repository = InMemoryStateRepository::new();
/// repository.save(ViewState::new("foo", selection, order)).await?;
/// let state = repository.load_active().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateRepository {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStateRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl StateRepository for InMemoryStateRepository {
    fn save(&self, state: ViewState) -> BoxFuture<'static, Result<(), RepositoryError>> {
        let data = Arc::clone(&self.data);
        Box::pin(async move {
            let mut guard = data.write().await;
            tracing::debug!(
                search = %state.search,
                selection = state.selection.len(),
                order = state.order.len(),
                "Storing view state"
            );
            guard.entries.insert(
                state.search.clone(),
                StoredLists {
                    selection: state.selection,
                    order: state.order,
                },
            );
            guard.active_search = state.search;
            Ok(())
        })
    }

    fn load_active(&self) -> BoxFuture<'static, Result<ViewState, RepositoryError>> {
        let data = Arc::clone(&self.data);
        Box::pin(async move {
            let guard = data.read().await;
            let search = guard.active_search.clone();
            let state = guard.entries.get(&search).map_or_else(
                || ViewState::empty(search.clone()),
                |lists| ViewState::new(search.clone(), lists.selection.clone(), lists.order.clone()),
            );
            Ok(state)
        })
    }

    fn find_order(&self, search: &str) -> BoxFuture<'static, Result<Vec<ItemId>, RepositoryError>> {
        let data = Arc::clone(&self.data);
        let search = search.to_string();
        Box::pin(async move {
            let guard = data.read().await;
            Ok(guard
                .entries
                .get(&search)
                .map(|lists| lists.order.clone())
                .unwrap_or_default())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
