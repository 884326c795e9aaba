//! Per-search view state.

use serde::{Deserialize, Serialize};

use super::item::ItemId;

/// Selection and order stored for one search key, plus the key itself.
///
/// The same shape is written by `POST /selection` and read back by
/// `GET /selection`. Ids are stored exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    /// Checked items.
    #[serde(default)]
    pub selection: Vec<ItemId>,
    /// Custom display order. Only consulted for the unfiltered view.
    #[serde(default)]
    pub order: Vec<ItemId>,
    /// The search key this state belongs to.
    #[serde(default)]
    pub search: String,
}

impl ViewState {
    #[must_use]
    pub fn new(search: impl Into<String>, selection: Vec<ItemId>, order: Vec<ItemId>) -> Self {
        Self {
            selection,
            order,
            search: search.into(),
        }
    }

    /// The state reported for a key nothing has been written for.
    #[must_use]
    pub fn empty(search: impl Into<String>) -> Self {
        Self::new(search, Vec::new(), Vec::new())
    }
}
