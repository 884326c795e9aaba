//! Catalog listing rules.
//!
//! The catalog is the virtual range `1..=N`. Nothing is materialized: a page is
//! computed either arithmetically (plain unfiltered range) or by a single scan
//! over the range that counts matches while collecting the requested window.
//!
//! # Listing branches
//!
//! - [`Selector::Explicit`]: the given ids, in the given order, ignoring
//!   `limit`, `offset`, filter and stored order.
//! - [`Selector::Filtered`]: the range, filtered by substring, with the stored
//!   order spliced in front when the view is unfiltered. When an exclusion list
//!   is present the window always starts at 0.
//!
//! Windows follow [`Window::bounds`]: fractional bounds truncate and negative
//! bounds count back from the end of the working set.

use std::collections::HashSet;

use super::item::{Filter, ItemId};

/// Number of items in the catalog unless configured otherwise.
pub const DEFAULT_CATALOG_SIZE: i64 = 1_000_000;

/// Upper bound for the initial capacity of a page buffer.
const MAX_PREALLOCATED: usize = 1024;

// =============================================================================
// Request / Result
// =============================================================================

/// Which items a listing is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Exactly these ids, in this order.
    Explicit(Vec<ItemId>),
    /// The catalog range narrowed by a filter.
    Filtered {
        filter: Filter,
        /// Ids to drop. When present, `offset` is not applied.
        exclude: Option<Vec<ItemId>>,
    },
}

/// Requested slice of the working set, as `limit`/`offset` numbers.
///
/// The bounds are `offset` and `offset + limit`, each truncated toward zero.
/// A negative bound counts back from the end of the working set and both are
/// clamped to its length, so `offset = -10, limit = 3` yields the items at
/// positions `len - 10 .. len - 7`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub offset: f64,
    pub limit: f64,
}

impl Window {
    #[must_use]
    pub const fn new(offset: f64, limit: f64) -> Self {
        Self { offset, limit }
    }

    /// Integer page starting at `offset`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn page(offset: usize, limit: usize) -> Self {
        Self::new(offset as f64, limit as f64)
    }

    /// The same `limit`, starting at the front of the working set.
    #[must_use]
    pub const fn leading(self) -> Self {
        Self::new(0.0, self.limit)
    }

    /// Returns true if a bound can only be placed once the length is known.
    fn counts_from_end(self) -> bool {
        self.offset.trunc() < 0.0 || (self.offset + self.limit).trunc() < 0.0
    }

    /// Resolves the window to `[start, end)` positions in a working set of
    /// `len` items. `end` is never below `start`.
    #[must_use]
    pub fn bounds(self, len: u64) -> (u64, u64) {
        let start = resolve_index(self.offset, len);
        let end = resolve_index(self.offset + self.limit, len);
        (start, end.max(start))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn resolve_index(value: f64, len: u64) -> u64 {
    if value.is_nan() {
        return 0;
    }
    let len = len as f64;
    let index = value.trunc();
    let resolved = if index < 0.0 {
        (len + index).max(0.0)
    } else {
        index.min(len)
    };
    // Float to int casts saturate.
    resolved as u64
}

/// A normalized listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub selector: Selector,
    pub window: Window,
}

impl ListRequest {
    /// Creates a request over the catalog range.
    #[must_use]
    pub fn filtered(search: &str, limit: usize, offset: usize) -> Self {
        Self {
            selector: Selector::Filtered {
                filter: Filter::from_search(search),
                exclude: None,
            },
            window: Window::page(offset, limit),
        }
    }

    /// Creates a request for an explicit id list.
    #[must_use]
    pub const fn explicit(ids: Vec<ItemId>) -> Self {
        Self {
            selector: Selector::Explicit(ids),
            window: Window::new(0.0, 0.0),
        }
    }

    /// Replaces the requested window.
    #[must_use]
    pub const fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Adds an exclusion list. Has no effect on explicit requests.
    #[must_use]
    pub fn excluding(mut self, ids: Vec<ItemId>) -> Self {
        if let Selector::Filtered { exclude, .. } = &mut self.selector {
            *exclude = Some(ids);
        }
        self
    }

    /// Returns true if the stored order can apply to this request.
    #[must_use]
    pub const fn uses_stored_order(&self) -> bool {
        matches!(
            &self.selector,
            Selector::Filtered {
                filter: Filter::Unfiltered,
                ..
            }
        )
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemPage {
    /// Items in the requested window.
    pub items: Vec<ItemId>,
    /// Size of the whole working set the window was cut from.
    pub total: u64,
}

// =============================================================================
// Catalog
// =============================================================================

/// The virtual item collection `1..=size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    size: i64,
}

impl Catalog {
    /// Creates a catalog of `size` items. Negative sizes yield an empty catalog.
    #[must_use]
    pub const fn new(size: i64) -> Self {
        Self {
            size: if size < 0 { 0 } else { size },
        }
    }

    #[must_use]
    pub const fn size(&self) -> i64 {
        self.size
    }

    /// Lists one page.
    ///
    /// `stored_order` is the order list stored for the request's search key
    /// (empty when none). It is only spliced in for unfiltered requests.
    #[must_use]
    pub fn list(&self, request: &ListRequest, stored_order: &[ItemId]) -> ItemPage {
        match &request.selector {
            Selector::Explicit(ids) => ItemPage {
                items: ids.clone(),
                total: ids.len() as u64,
            },
            Selector::Filtered { filter, exclude } => {
                let prefix = if filter.is_unfiltered() {
                    unique_prefix(stored_order)
                } else {
                    Vec::new()
                };
                let excluded: HashSet<ItemId> = exclude.iter().flatten().copied().collect();
                let window = if exclude.is_some() {
                    request.window.leading()
                } else {
                    request.window
                };

                if filter.is_unfiltered() && prefix.is_empty() && excluded.is_empty() {
                    self.range_page(window)
                } else {
                    self.scan(filter, &prefix, &excluded, window)
                }
            }
        }
    }

    /// Window over the plain range, computed without scanning.
    fn range_page(&self, window: Window) -> ItemPage {
        let total = u64::try_from(self.size).unwrap_or(0);
        let (start, end) = window.bounds(total);
        let first = i64::try_from(start).unwrap_or(self.size);
        let last = i64::try_from(end).unwrap_or(self.size);

        ItemPage {
            items: (first..last).map(|index| ItemId::new(index + 1)).collect(),
            total,
        }
    }

    /// Pass over `prefix ++ (range \ prefix)` that keeps the window and counts
    /// every surviving item. A window counted from the end takes one extra
    /// counting pass first.
    fn scan(
        &self,
        filter: &Filter,
        prefix: &[ItemId],
        excluded: &HashSet<ItemId>,
        window: Window,
    ) -> ItemPage {
        let prefix_set: HashSet<ItemId> = prefix.iter().copied().collect();
        let length = if window.counts_from_end() {
            working_set(self.size, filter, prefix, &prefix_set, excluded).count() as u64
        } else {
            u64::MAX
        };
        let (start, end) = window.bounds(length);

        let capacity = usize::try_from(end - start).map_or(MAX_PREALLOCATED, |count| {
            count.min(MAX_PREALLOCATED)
        });
        let mut items = Vec::with_capacity(capacity);
        let mut total: u64 = 0;
        for item in working_set(self.size, filter, prefix, &prefix_set, excluded) {
            if total >= start && total < end {
                items.push(item);
            }
            total += 1;
        }

        ItemPage { items, total }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_SIZE)
    }
}

/// The filtered, spliced sequence a listing window is cut from.
fn working_set<'a>(
    size: i64,
    filter: &'a Filter,
    prefix: &'a [ItemId],
    prefix_set: &'a HashSet<ItemId>,
    excluded: &'a HashSet<ItemId>,
) -> impl Iterator<Item = ItemId> + 'a {
    let remainder = (1..=size)
        .map(ItemId::new)
        .filter(move |item| !prefix_set.contains(item));

    let mut buffer = String::new();
    prefix
        .iter()
        .copied()
        .chain(remainder)
        .filter(move |item| filter.matches(*item, &mut buffer))
        .filter(move |item| !excluded.contains(item))
}

/// Drops repeated ids, keeping the first occurrence.
fn unique_prefix(order: &[ItemId]) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(order.len());
    order
        .iter()
        .copied()
        .filter(|item| seen.insert(*item))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn ids(values: &[i64]) -> Vec<ItemId> {
        values.iter().copied().map(ItemId::new).collect()
    }

    fn values(page: &ItemPage) -> Vec<i64> {
        page.items.iter().copied().map(ItemId::value).collect()
    }

    #[rstest]
    fn test_first_page_of_full_range() {
        let catalog = Catalog::default();
        let page = catalog.list(&ListRequest::filtered("", 20, 0), &[]);

        assert_eq!(values(&page), (1..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 1_000_000);
    }

    #[rstest]
    fn test_last_page_is_truncated() {
        let catalog = Catalog::new(45);
        let page = catalog.list(&ListRequest::filtered("", 20, 40), &[]);

        assert_eq!(values(&page), vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total, 45);
    }

    #[rstest]
    fn test_offset_past_end_is_empty() {
        let catalog = Catalog::new(10);
        let page = catalog.list(&ListRequest::filtered("", 20, 100), &[]);

        assert!(page.items.is_empty());
        assert_eq!(page.total, 10);
    }

    #[rstest]
    fn test_substring_filter_returns_smallest_matches() {
        let catalog = Catalog::default();
        let page = catalog.list(&ListRequest::filtered("99", 5, 0), &[]);

        assert_eq!(values(&page), vec![99, 199, 299, 399, 499]);
    }

    #[rstest]
    fn test_substring_filter_total_counts_all_matches() {
        let catalog = Catalog::new(1000);
        let page = catalog.list(&ListRequest::filtered("99", 5, 0), &[]);

        // x99 for x in 0..=9, plus 990..=998.
        assert_eq!(page.total, 19);
    }

    #[rstest]
    fn test_substring_filter_honors_offset() {
        let catalog = Catalog::new(1000);
        let page = catalog.list(&ListRequest::filtered("99", 3, 9), &[]);

        assert_eq!(values(&page), vec![990, 991, 992]);
    }

    #[rstest]
    fn test_explicit_ids_keep_order_and_ignore_window() {
        let catalog = Catalog::default();
        let request = ListRequest::explicit(ids(&[5, 3, 1])).with_window(Window::page(2, 1));

        let page = catalog.list(&request, &ids(&[9, 8]));

        assert_eq!(values(&page), vec![5, 3, 1]);
        assert_eq!(page.total, 3);
    }

    #[rstest]
    fn test_explicit_ids_are_not_range_checked() {
        let catalog = Catalog::new(10);
        let page = catalog.list(&ListRequest::explicit(ids(&[0, 11, 11])), &[]);

        assert_eq!(values(&page), vec![0, 11, 11]);
        assert_eq!(page.total, 3);
    }

    #[rstest]
    fn test_exclude_ignores_offset() {
        let catalog = Catalog::default();
        let request = ListRequest::filtered("", 3, 10).excluding(ids(&[1, 2, 3]));

        let page = catalog.list(&request, &[]);

        assert_eq!(values(&page), vec![4, 5, 6]);
        assert_eq!(page.total, 999_997);
    }

    #[rstest]
    fn test_empty_exclusion_list_still_ignores_offset() {
        let catalog = Catalog::new(100);
        let request = ListRequest::filtered("", 2, 50).excluding(Vec::new());

        let page = catalog.list(&request, &[]);

        assert_eq!(values(&page), vec![1, 2]);
        assert_eq!(page.total, 100);
    }

    #[rstest]
    fn test_exclude_applies_after_substring_filter() {
        let catalog = Catalog::new(1000);
        let request = ListRequest::filtered("99", 2, 0).excluding(ids(&[99, 299]));

        let page = catalog.list(&request, &[]);

        assert_eq!(values(&page), vec![199, 399]);
        assert_eq!(page.total, 17);
    }

    #[rstest]
    fn test_stored_order_is_spliced_in_front() {
        let catalog = Catalog::default();
        let page = catalog.list(&ListRequest::filtered("", 5, 0), &ids(&[5, 1, 3]));

        assert_eq!(values(&page), vec![5, 1, 3, 2, 4]);
        assert_eq!(page.total, 1_000_000);
    }

    #[rstest]
    fn test_stored_order_splice_with_offset() {
        let catalog = Catalog::new(10);
        let page = catalog.list(&ListRequest::filtered("", 3, 2), &ids(&[5, 1, 3]));

        assert_eq!(values(&page), vec![3, 2, 4]);
    }

    #[rstest]
    fn test_stored_order_duplicates_collapse() {
        let catalog = Catalog::new(5);
        let page = catalog.list(&ListRequest::filtered("", 10, 0), &ids(&[4, 4, 2]));

        assert_eq!(values(&page), vec![4, 2, 1, 3, 5]);
        assert_eq!(page.total, 5);
    }

    #[rstest]
    fn test_stored_order_entries_outside_range_are_kept() {
        let catalog = Catalog::new(3);
        let page = catalog.list(&ListRequest::filtered("", 10, 0), &ids(&[7, 2]));

        assert_eq!(values(&page), vec![7, 2, 1, 3]);
        assert_eq!(page.total, 4);
    }

    #[rstest]
    fn test_stored_order_ignored_for_filtered_view() {
        let catalog = Catalog::new(1000);
        let page = catalog.list(&ListRequest::filtered("99", 3, 0), &ids(&[999, 99]));

        assert_eq!(values(&page), vec![99, 199, 299]);
    }

    #[rstest]
    fn test_exclude_combines_with_stored_order() {
        let catalog = Catalog::new(10);
        let request = ListRequest::filtered("", 4, 7).excluding(ids(&[5, 2]));

        let page = catalog.list(&request, &ids(&[5, 1, 3]));

        assert_eq!(values(&page), vec![1, 3, 4, 6]);
        assert_eq!(page.total, 8);
    }

    #[rstest]
    fn test_excluding_has_no_effect_on_explicit_request() {
        let request = ListRequest::explicit(ids(&[1, 2])).excluding(ids(&[1]));
        assert_eq!(request.selector, Selector::Explicit(ids(&[1, 2])));
    }

    #[rstest]
    #[case(ListRequest::filtered("", 20, 0), true)]
    #[case(ListRequest::filtered("1", 20, 0), false)]
    #[case(ListRequest::explicit(vec![]), false)]
    fn test_uses_stored_order(#[case] request: ListRequest, #[case] expected: bool) {
        assert_eq!(request.uses_stored_order(), expected);
    }

    #[rstest]
    fn test_negative_size_is_empty_catalog() {
        let catalog = Catalog::new(-4);
        assert_eq!(catalog.size(), 0);
        assert!(catalog.list(&ListRequest::filtered("", 20, 0), &[]).items.is_empty());
    }

    #[rstest]
    #[case(Window::new(0.0, 20.0), 100, (0, 20))]
    #[case(Window::new(4.2, 2.9), 100, (4, 7))]
    #[case(Window::new(-10.0, 3.0), 100, (90, 93))]
    #[case(Window::new(-10.0, 30.0), 100, (90, 90))]
    #[case(Window::new(-500.0, 3.0), 100, (0, 0))]
    #[case(Window::new(-500.0, 450.0), 100, (0, 50))]
    #[case(Window::new(5.0, -2.0), 100, (5, 5))]
    #[case(Window::new(0.0, -2.0), 100, (0, 98))]
    #[case(Window::new(-0.5, 2.0), 100, (0, 1))]
    #[case(Window::new(0.0, f64::INFINITY), 100, (0, 100))]
    #[case(Window::new(150.0, 20.0), 100, (100, 100))]
    fn test_window_bounds(#[case] window: Window, #[case] len: u64, #[case] expected: (u64, u64)) {
        assert_eq!(window.bounds(len), expected);
    }

    #[rstest]
    fn test_negative_offset_counts_from_end() {
        let catalog = Catalog::new(100);
        let request = ListRequest::filtered("", 0, 0).with_window(Window::new(-10.0, 3.0));

        let page = catalog.list(&request, &[]);

        assert_eq!(values(&page), vec![91, 92, 93]);
        assert_eq!(page.total, 100);
    }

    #[rstest]
    fn test_fractional_bounds_truncate_separately() {
        let catalog = Catalog::new(100);
        let request = ListRequest::filtered("", 0, 0).with_window(Window::new(4.2, 2.9));

        let page = catalog.list(&request, &[]);

        assert_eq!(values(&page), vec![5, 6, 7]);
    }

    #[rstest]
    fn test_negative_offset_in_filtered_view() {
        let catalog = Catalog::new(1000);
        let request = ListRequest::filtered("99", 0, 0).with_window(Window::new(-3.0, 2.0));

        let page = catalog.list(&request, &[]);

        // Ascending matches end with 997, 998, 999.
        assert_eq!(values(&page), vec![997, 998]);
        assert_eq!(page.total, 19);
    }

    #[rstest]
    fn test_negative_offset_in_spliced_view() {
        let catalog = Catalog::new(5);
        let request = ListRequest::filtered("", 0, 0).with_window(Window::new(-3.0, 2.0));

        let page = catalog.list(&request, &ids(&[5, 1]));

        assert_eq!(values(&page), vec![2, 3]);
        assert_eq!(page.total, 5);
    }

    #[rstest]
    fn test_exclusion_window_uses_only_limit() {
        let catalog = Catalog::new(10);
        let request = ListRequest::filtered("", 0, 0)
            .with_window(Window::new(-3.0, -7.0))
            .excluding(ids(&[1]));

        let page = catalog.list(&request, &[]);

        // slice(0, -7) over the 9 remaining items.
        assert_eq!(values(&page), vec![2, 3]);
        assert_eq!(page.total, 9);
    }

    proptest! {
        /// A page never holds more than `limit` items.
        #[test]
        fn page_never_exceeds_limit(
            limit in 0usize..50,
            offset in 0usize..300,
            order in proptest::collection::vec(1i64..=200, 0..20),
        ) {
            let catalog = Catalog::new(200);
            let page = catalog.list(&ListRequest::filtered("", limit, offset), &ids(&order));
            prop_assert!(page.items.len() <= limit);
        }

        /// The unfiltered spliced view lists every catalog item exactly once.
        #[test]
        fn spliced_view_is_a_permutation(order in proptest::collection::vec(1i64..=50, 0..30)) {
            let catalog = Catalog::new(50);
            let page = catalog.list(&ListRequest::filtered("", 100, 0), &ids(&order));

            let mut sorted = values(&page);
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (1..=50).collect::<Vec<_>>());
            prop_assert_eq!(page.total, 50);
        }
    }
}
