//! Browser session: the client-side state machine of the list browser.
//!
//! A [`BrowserSession`] owns the loaded items, the selection, the custom order
//! and the search text, and talks to the catalog service through a
//! [`CatalogClient`]. Every user gesture (search, scroll, drag, toggle) is an
//! async method that updates local state, pushes the `(selection, order,
//! search)` triple back to the service and loads the next page.
//!
//! # State machine
//!
//! ```text
//! Uninitialized --bootstrap--> Ready
//! Ready --load_page--> Loading --response--> Ready
//! Ready --begin_drag--> Dragging --end_drag--> Ready
//! ```

use std::collections::HashSet;

use super::paging::{PAGE_SIZE, PagePlan, Viewport, append_unique, move_item};
use super::transport::{CatalogClient, ClientError};
use crate::domain::{ItemId, ViewState};

// =============================================================================
// Cursor
// =============================================================================

/// Paging position of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Position of the next page within the current view.
    pub offset: usize,
    /// Whether another page may exist.
    pub has_more: bool,
}

impl Cursor {
    const fn reset() -> Self {
        Self {
            offset: 0,
            has_more: true,
        }
    }
}

// =============================================================================
// Browser Session
// =============================================================================

/// Paging, search, reorder and selection state of one list browser.
pub struct BrowserSession<C> {
    client: C,
    page_size: usize,
    items: Vec<ItemId>,
    selection: Vec<ItemId>,
    order: Vec<ItemId>,
    search: String,
    cursor: Cursor,
    loading: bool,
    dragging: bool,
    ready: bool,
    loaded_ids: HashSet<ItemId>,
}

impl<C: CatalogClient> BrowserSession<C> {
    /// Creates an uninitialized session. Call [`Self::bootstrap`] before use.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_page_size(client, PAGE_SIZE)
    }

    #[must_use]
    pub fn with_page_size(client: C, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
            items: Vec::new(),
            selection: Vec::new(),
            order: Vec::new(),
            search: String::new(),
            cursor: Cursor::reset(),
            loading: false,
            dragging: false,
            ready: false,
            loaded_ids: HashSet::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Adopts the server's active state and loads the first page.
    ///
    /// If the adopted search differs from the local one, the search-change
    /// refresh runs before the first sync.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the state or the first page cannot be fetched.
    pub async fn bootstrap(&mut self) -> Result<(), ClientError> {
        let state = self.client.load_state().await?;
        let search_changed = state.search != self.search;

        self.selection = state.selection;
        self.order = state.order;
        self.search = state.search;
        self.reset_page_cache();
        self.ready = true;

        tracing::info!(
            search = %self.search,
            selection = self.selection.len(),
            order = self.order.len(),
            "Session bootstrapped"
        );

        if search_changed {
            self.refresh_for_search().await?;
        }
        self.sync_state().await;
        self.load_page().await
    }

    /// Replaces the search text.
    ///
    /// Unchanged text is a no-op. Otherwise the stored state is re-read, the
    /// loaded pages are dropped, and the first page of the new view is loaded.
    /// Clearing the search also clears the custom order.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the state or the first page cannot be fetched.
    pub async fn set_search(&mut self, search: impl Into<String>) -> Result<(), ClientError> {
        let search = search.into();
        if search == self.search {
            return Ok(());
        }
        self.search = search;
        if !self.ready {
            return Ok(());
        }

        self.refresh_for_search().await?;
        self.sync_state().await;
        self.load_page().await
    }

    /// Loads the page at the current cursor and merges it into the list.
    ///
    /// On failure the session stays in the loading state, which blocks
    /// further scroll-triggered loads.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the request fails.
    pub async fn load_page(&mut self) -> Result<(), ClientError> {
        if !self.ready {
            return Ok(());
        }

        let offset = self.cursor.offset;
        let plan = PagePlan::plan(&self.search, &self.order, offset, self.page_size);
        self.loading = true;

        let response = match self.client.list_items(plan.query(self.page_size)).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, ?plan, "Page load failed");
                return Err(error);
            }
        };
        let received = response.items.len();

        match plan {
            PagePlan::Search { .. } => {
                if offset == 0 {
                    self.items.clear();
                }
                append_unique(&mut self.items, response.items);
                let next = u64::try_from(offset + self.page_size).unwrap_or(u64::MAX);
                self.cursor.has_more = next < response.total;
            }
            PagePlan::OrderedSlice { ids } => {
                append_unique(&mut self.items, response.items);
                self.loaded_ids.extend(ids);
                self.cursor.has_more = offset + self.page_size < self.order.len();
            }
            PagePlan::Range { .. } | PagePlan::AfterOrder { .. } => {
                append_unique(&mut self.items, response.items);
                self.cursor.has_more = received == self.page_size;
            }
        }
        self.loading = false;

        tracing::debug!(
            offset,
            received,
            displayed = self.items.len(),
            has_more = self.cursor.has_more,
            "Page loaded"
        );
        Ok(())
    }

    /// Handles a scroll event; loads the next page when the bottom is reached.
    ///
    /// Returns whether a page load was triggered.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the triggered load fails.
    pub async fn on_scroll(&mut self, viewport: Viewport) -> Result<bool, ClientError> {
        if !self.ready
            || !viewport.near_bottom()
            || !self.cursor.has_more
            || self.loading
            || self.dragging
        {
            return Ok(false);
        }
        self.cursor.offset += self.page_size;
        self.load_page().await?;
        Ok(true)
    }

    /// Marks the start of a drag gesture. Scroll loads are suppressed until
    /// [`Self::end_drag`].
    pub const fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Completes a drag gesture moving the row at `source` to `destination`.
    ///
    /// A drop outside the list (`None`) or an out-of-range index only ends
    /// the gesture. Otherwise the new arrangement becomes the custom order,
    /// the cursor moves past it, and the state is synced before the next page
    /// is loaded.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the follow-up page load fails.
    pub async fn end_drag(
        &mut self,
        source: usize,
        destination: Option<usize>,
    ) -> Result<(), ClientError> {
        self.dragging = false;
        let Some(destination) = destination else {
            return Ok(());
        };
        if source >= self.items.len() || destination >= self.items.len() {
            return Ok(());
        }

        let within_order = self.search.is_empty()
            && !self.order.is_empty()
            && source < self.order.len()
            && destination < self.order.len();

        if within_order {
            move_item(&mut self.order, source, destination);
            let shown = self.items.len().min(self.order.len());
            self.items = self.order[..shown].to_vec();
        } else {
            move_item(&mut self.items, source, destination);
            self.order.clone_from(&self.items);
        }
        self.cursor.offset = self.order.len();

        tracing::debug!(source, destination, order = self.order.len(), "Item moved");

        self.sync_state().await;
        self.load_page().await
    }

    /// Adds `item` to the selection, or removes it if already selected.
    pub async fn toggle_selection(&mut self, item: ItemId) {
        if self.selection.contains(&item) {
            self.selection.retain(|selected| *selected != item);
        } else {
            self.selection.push(item);
        }
        self.sync_state().await;
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn refresh_for_search(&mut self) -> Result<(), ClientError> {
        let state = self.client.load_state().await?;
        self.selection = state.selection;
        self.order = state.order;
        self.reset_page_cache();
        if self.search.is_empty() {
            self.order.clear();
        }
        Ok(())
    }

    /// Pushes the current triple to the service. Failures are logged only.
    async fn sync_state(&self) {
        if !self.ready {
            return;
        }
        let state = ViewState::new(
            self.search.clone(),
            self.selection.clone(),
            self.order.clone(),
        );
        if let Err(error) = self.client.save_state(state).await {
            tracing::warn!(%error, "State sync failed");
        }
    }

    fn reset_page_cache(&mut self) {
        self.items.clear();
        self.loaded_ids.clear();
        self.cursor = Cursor::reset();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Displayed rows with their selection flag.
    #[must_use]
    pub fn rows(&self) -> Vec<(ItemId, bool)> {
        let selected: HashSet<ItemId> = self.selection.iter().copied().collect();
        self.items
            .iter()
            .map(|item| (*item, selected.contains(item)))
            .collect()
    }

    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    #[must_use]
    pub fn selection(&self) -> &[ItemId] {
        &self.selection
    }

    #[must_use]
    pub fn order(&self) -> &[ItemId] {
        &self.order
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Ids fetched through the custom-order branch since the last reset.
    #[must_use]
    pub const fn loaded_ids(&self) -> &HashSet<ItemId> {
        &self.loaded_ids
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }
}

// =============================================================================
// Tests
// =============================================================================
