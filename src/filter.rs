//! Filter
//!
//! The user's current category/sort/search selection. A plain value
//! holder with last-write-wins semantics; applying the filter to a
//! product listing is the UI layer's concern.

use serde::{Deserialize, Serialize};

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Catalog order
    #[default]
    None,

    /// Cheapest first
    PriceAscending,

    /// Most expensive first
    PriceDescending,
}

/// The current filter selection. An empty category means no filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected category, empty for all
    pub category: String,

    /// Selected sort order
    pub sort_by: SortBy,

    /// Free-text search query
    pub search_query: String,
}

/// A partial filter update; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    /// New category, if changing
    pub category: Option<String>,

    /// New sort order, if changing
    pub sort_by: Option<SortBy>,

    /// New search query, if changing
    pub search_query: Option<String>,
}

impl FilterUpdate {
    /// An update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the sort order.
    #[must_use]
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Set the search query.
    #[must_use]
    pub fn search_query(mut self, search_query: impl Into<String>) -> Self {
        self.search_query = Some(search_query.into());
        self
    }
}

impl FilterState {
    /// Merge a partial update into this state, last write winning.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(category) = update.category {
            self.category = category;
        }

        if let Some(sort_by) = update.sort_by {
            self.sort_by = sort_by;
        }

        if let Some(search_query) = update.search_query {
            self.search_query = search_query;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_merges_only_the_set_fields() {
        let mut state = FilterState::default();

        state.apply(FilterUpdate::new().category("smartphones"));
        state.apply(FilterUpdate::new().sort_by(SortBy::PriceAscending));

        assert_eq!(state.category, "smartphones");
        assert_eq!(state.sort_by, SortBy::PriceAscending);
        assert_eq!(state.search_query, "");
    }

    #[test]
    fn last_write_wins() {
        let mut state = FilterState::default();

        state.apply(FilterUpdate::new().search_query("phone"));
        state.apply(FilterUpdate::new().search_query("laptop"));

        assert_eq!(state.search_query, "laptop");
    }

    #[test]
    fn default_state_means_no_filtering() {
        let state = FilterState::default();

        assert!(state.category.is_empty());
        assert_eq!(state.sort_by, SortBy::None);
        assert!(state.search_query.is_empty());
    }
}
