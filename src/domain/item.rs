//! Item identity and search filters.

use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Identifier of a catalog item.
///
/// Items carry no attributes beyond their identity. Valid catalog items live
/// in `[1, N]`, but ids received from clients are never range-checked, so the
/// inner value is signed to accept whatever a client sends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Parses one entry of a comma-separated id list.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for anything that is
    /// not an integer.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self)
    }

    /// Parses a comma-separated id list such as `"5,3,1"`.
    ///
    /// Entries that do not parse are skipped, the remaining ids keep their
    /// original order and duplicates are preserved.
    #[must_use]
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',').filter_map(Self::parse).collect()
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Search filter derived from a search key.
///
/// The empty search key maps to [`Filter::Unfiltered`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Unfiltered,
    /// Keeps items whose decimal representation contains the needle.
    BySubstring(String),
}

impl Filter {
    /// Builds the filter for a search key.
    #[must_use]
    pub fn from_search(search: &str) -> Self {
        if search.is_empty() {
            Self::Unfiltered
        } else {
            Self::BySubstring(search.to_string())
        }
    }

    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        matches!(self, Self::Unfiltered)
    }

    /// Returns true if the item passes the filter.
    ///
    /// `buffer` is scratch space, overwritten on every call.
    pub fn matches(&self, item: ItemId, buffer: &mut String) -> bool {
        use std::fmt::Write;

        match self {
            Self::Unfiltered => true,
            Self::BySubstring(needle) => {
                buffer.clear();
                // Writing an integer into a String cannot fail.
                let _ = write!(buffer, "{}", item.0);
                buffer.contains(needle.as_str())
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
