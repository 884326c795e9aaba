//! Data Transfer Objects for API requests and responses.
//!
//! The query DTO keeps every numeric parameter as a raw string so that
//! malformed values coerce to defaults instead of failing extraction.

use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, ListRequest, Window};

/// Page size used when `limit` is missing or not a number.
pub const DEFAULT_LIMIT: usize = 20;

// =============================================================================
// GET /items
// =============================================================================

/// Query parameters for `GET /items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItemsQuery {
    /// Substring filter. Empty means unfiltered.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    /// Comma-separated explicit ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<String>,
    /// Comma-separated ids to leave out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl ListItemsQuery {
    /// Query over the catalog range.
    #[must_use]
    pub fn page(search: impl Into<String>, offset: usize, limit: usize) -> Self {
        Self {
            search: search.into(),
            limit: Some(limit.to_string()),
            offset: Some(offset.to_string()),
            ..Self::default()
        }
    }

    /// Query for an explicit id list.
    #[must_use]
    pub fn by_ids(ids: &[ItemId]) -> Self {
        Self {
            ids: Some(join_ids(ids)),
            ..Self::default()
        }
    }

    /// Normalizes the raw parameters into a listing request.
    ///
    /// - a non-empty `ids` list selects exactly those ids;
    /// - otherwise the range is filtered by `search`, and a non-empty
    ///   `exclude` list is attached;
    /// - `limit`/`offset` go through [`coerce_number`], falling back to
    ///   `default_limit` and 0.
    #[must_use]
    pub fn to_request(&self, default_limit: usize) -> ListRequest {
        if let Some(ids) = non_empty(self.ids.as_deref()) {
            return ListRequest::explicit(ItemId::parse_list(ids));
        }

        let fallback = Window::page(0, default_limit);
        let window = Window::new(
            coerce_number(self.offset.as_deref()).unwrap_or(fallback.offset),
            coerce_number(self.limit.as_deref()).unwrap_or(fallback.limit),
        );
        let request = ListRequest::filtered(&self.search, 0, 0).with_window(window);

        match non_empty(self.exclude.as_deref()) {
            Some(exclude) => request.excluding(ItemId::parse_list(exclude)),
            None => request,
        }
    }
}

/// Response body of `GET /items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<ItemId>,
    pub total: u64,
}

// =============================================================================
// POST /selection
// =============================================================================

/// Response body of `POST /selection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStateResponse {
    pub success: bool,
}

impl SaveStateResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// Parses a raw numeric parameter.
///
/// Missing, blank and non-numeric values yield `None`. Decimals, negatives and
/// infinities are kept as given; [`Window::bounds`] decides what they select.
#[must_use]
pub fn coerce_number(raw: Option<&str>) -> Option<f64> {
    non_empty(raw)?
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Joins ids into the comma-separated wire form.
#[must_use]
pub fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

// =============================================================================
// Tests
// =============================================================================
