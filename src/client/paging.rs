//! Pure paging helpers used by the browser session.
//!
//! Nothing here performs I/O: the session asks [`PagePlan::plan`] which request
//! to issue, merges the answer with [`append_unique`], and applies drag
//! gestures with [`move_item`].

use std::collections::HashSet;

use crate::api::ListItemsQuery;
use crate::domain::ItemId;

/// Number of items requested per page.
pub const PAGE_SIZE: usize = 20;

/// Distance from the bottom, in pixels, that still counts as "at the bottom".
pub const SCROLL_THRESHOLD: f64 = 1.0;

// =============================================================================
// Page Plan
// =============================================================================

/// The request the session issues for the current cursor.
///
/// Exactly one variant applies for any combination of search, order and
/// offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePlan {
    /// Non-empty search: filtered window at `offset`.
    Search { search: String, offset: usize },
    /// Empty search inside the custom order: fetch these ids.
    OrderedSlice { ids: Vec<ItemId> },
    /// Empty search, no custom order: plain window at `offset`.
    Range { offset: usize },
    /// Empty search past the custom order: window at `offset`, already
    /// shifted back by the order length.
    AfterOrder { offset: usize },
}

impl PagePlan {
    /// Chooses the request for the given cursor.
    #[must_use]
    pub fn plan(search: &str, order: &[ItemId], offset: usize, page_size: usize) -> Self {
        if !search.is_empty() {
            return Self::Search {
                search: search.to_string(),
                offset,
            };
        }
        if order.is_empty() {
            return Self::Range { offset };
        }
        if offset < order.len() {
            let end = offset.saturating_add(page_size).min(order.len());
            return Self::OrderedSlice {
                ids: order[offset..end].to_vec(),
            };
        }
        Self::AfterOrder {
            offset: offset - order.len(),
        }
    }

    /// Wire query for this plan.
    #[must_use]
    pub fn query(&self, page_size: usize) -> ListItemsQuery {
        match self {
            Self::Search { search, offset } => ListItemsQuery::page(search.clone(), *offset, page_size),
            Self::OrderedSlice { ids } => ListItemsQuery::by_ids(ids),
            Self::Range { offset } | Self::AfterOrder { offset } => {
                ListItemsQuery::page(String::new(), *offset, page_size)
            }
        }
    }
}

// =============================================================================
// List Helpers
// =============================================================================

/// Appends incoming items that are not displayed yet.
///
/// Surviving items keep their relative order. An id repeated inside
/// `incoming` is appended once.
pub fn append_unique(displayed: &mut Vec<ItemId>, incoming: impl IntoIterator<Item = ItemId>) {
    let mut seen: HashSet<ItemId> = displayed.iter().copied().collect();
    displayed.extend(incoming.into_iter().filter(|item| seen.insert(*item)));
}

/// Moves the element at `source` to `destination`, shifting the ones between.
///
/// Returns false and leaves the list untouched if either index is out of
/// bounds.
pub fn move_item<T>(items: &mut Vec<T>, source: usize, destination: usize) -> bool {
    if source >= items.len() || destination >= items.len() {
        return false;
    }
    let moved = items.remove(source);
    items.insert(destination, moved);
    true
}

// =============================================================================
// Viewport
// =============================================================================

/// Scroll geometry of the list container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// True when the unscrolled remainder fits within the visible height
    /// plus [`SCROLL_THRESHOLD`].
    #[must_use]
    pub fn near_bottom(&self) -> bool {
        self.scroll_height - self.scroll_top <= self.client_height + SCROLL_THRESHOLD
    }
}

// =============================================================================
// Tests
// =============================================================================
