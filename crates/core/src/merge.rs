//! Folding extracted updates into the active filter state.

use serde::Serialize;

use crate::domain::filters::{ExtractedFilters, FilterState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterChange {
    Unchanged,
    Updated,
    Cleared,
}

impl FilterState {
    /// Applies a partial update from the extractor.
    ///
    /// `clear_all` wipes every field. A search term that differs from the
    /// active one starts a fresh query: category and both price bounds are
    /// dropped before the update lands, while the sort order is kept. Fields
    /// the update leaves as `None` are untouched.
    ///
    /// Bounds arriving in separate messages are not reconciled, so a state with
    /// `min_price > max_price` is possible and simply matches nothing.
    pub fn merge_extracted(&mut self, update: &ExtractedFilters) -> FilterChange {
        if update.clear_all {
            let was_empty = self.is_empty();
            self.clear();
            return if was_empty { FilterChange::Unchanged } else { FilterChange::Cleared };
        }

        let before = self.clone();

        if let Some(term) = update.search_term.as_deref().map(str::trim).filter(|term| !term.is_empty()) {
            if self.search_term.as_deref() != Some(term) {
                self.category = None;
                self.min_price = None;
                self.max_price = None;
            }
            self.search_term = Some(term.to_string());
        }
        if let Some(category) = update.category.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
            self.category = Some(category.to_string());
        }
        if let Some(min_price) = update.min_price.filter(|price| *price > 0) {
            self.min_price = Some(min_price);
        }
        if let Some(max_price) = update.max_price.filter(|price| *price > 0) {
            self.max_price = Some(max_price);
        }
        if let Some(sort_by) = &update.sort_by {
            self.sort_by = Some(sort_by.clone());
        }

        if *self == before {
            FilterChange::Unchanged
        } else {
            FilterChange::Updated
        }
    }
}
