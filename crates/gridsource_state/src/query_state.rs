//! The canonical query state owned by a data-source engine.

use crate::filter::{FilterMap, FilterValue, QUERY_VALUE_KEY};
use crate::sort::SortSpec;
use crate::view::View;

/// The canonical in-memory snapshot of page, limit, sort, filter values and
/// view selection.
///
/// Pure data: mutation helpers enforce the structural invariants (page
/// reset on filter change, reserved `queryValue` entry always present), but
/// no resolution or synchronization behavior lives here.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Current page, 1-based.
    pub page: u64,
    /// Page size, fixed per engine instance.
    pub limit: u64,
    /// Active sort entry, if any.
    pub sort: Option<SortSpec>,
    /// Filter values, always including the reserved `queryValue` entry.
    pub filters: FilterMap,
    /// Name of the currently selected saved view. `None` means the default
    /// "All" view.
    pub view_selected: Option<String>,
}

impl QueryState {
    /// Creates a query state on page 1 with an empty free-text term.
    pub fn new(limit: u64, sort: Option<SortSpec>) -> Self {
        let mut filters = FilterMap::new();
        filters.insert(QUERY_VALUE_KEY.to_string(), FilterValue::Scalar(String::new()));
        Self {
            page: 1,
            limit: limit.max(1),
            sort,
            filters,
            view_selected: None,
        }
    }

    /// Returns the free-text search term.
    pub fn query_value(&self) -> &str {
        match self.filters.get(QUERY_VALUE_KEY) {
            Some(FilterValue::Scalar(s)) => s,
            _ => "",
        }
    }

    /// Sets the free-text search term and resets the page to 1.
    pub fn set_query_value(&mut self, value: impl Into<String>) {
        self.filters
            .insert(QUERY_VALUE_KEY.to_string(), FilterValue::Scalar(value.into()));
        self.page = 1;
    }

    /// Replaces the filter map wholesale and resets the page to 1.
    ///
    /// The reserved `queryValue` entry is re-seeded as an empty scalar when
    /// the incoming map does not carry one, preserving the invariant that
    /// it is always present.
    pub fn set_filters(&mut self, filters: FilterMap) {
        self.filters = filters;
        self.filters
            .entry(QUERY_VALUE_KEY.to_string())
            .or_insert_with(|| FilterValue::Scalar(String::new()));
        self.page = 1;
    }

    /// Sets or clears the sort entry. Does not touch the page.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Moves to the given page. Pages are clamped to a minimum of 1.
    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Applies a saved view: records its name and replaces the filters with
    /// the view's preset. Resets the page to 1.
    pub fn select_view(&mut self, view: &View) {
        self.set_filters(view.filters.clone());
        self.view_selected = Some(view.name.clone());
    }

    /// Returns to the default "All" view: clears the selection and all
    /// filters, including the free-text term. Resets the page to 1.
    pub fn clear_view(&mut self) {
        self.set_filters(FilterMap::new());
        self.view_selected = None;
    }

    /// Iterates over non-empty filter entries, excluding the reserved
    /// free-text entry.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.filters
            .iter()
            .filter(|(key, value)| key.as_str() != QUERY_VALUE_KEY && !value.is_empty())
            .map(|(key, value)| (key.as_str(), value))
    }
}
