//! Free-text filter extraction from agent utterances.
//!
//! The extractor is a pure function of one message. Callers decide which
//! messages are eligible (see [`crate::session::MessageGate`]); feeding it
//! partial or user-authored text produces updates the user never asked for.

pub mod category;
pub mod intent;
pub mod price;
pub mod rules;
pub mod search;
pub mod sort;

use crate::domain::filters::ExtractedFilters;

#[derive(Clone, Debug, Default)]
pub struct FilterExtractor;

impl FilterExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns only the fields the text supports; everything else stays
    /// `None`. A "show everything" phrase short-circuits to a clear-all
    /// update with no other fields.
    pub fn extract(&self, text: &str) -> ExtractedFilters {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return ExtractedFilters::default();
        }

        if let Some(rule) = intent::show_all_rule(&normalized) {
            tracing::debug!(event_name = "extraction.show_all", rule, "message requests every product");
            return ExtractedFilters::clear_all();
        }

        let bounds = price::extract_price_bounds(&normalized);
        let search = search::extract_search_term(&normalized);
        let extracted = ExtractedFilters {
            search_term: search.map(|found| found.term),
            category: category::extract_category(&normalized).map(str::to_string),
            min_price: bounds.min,
            max_price: bounds.max,
            sort_by: sort::extract_sort(&normalized),
            clear_all: false,
        };

        if !extracted.is_empty() {
            tracing::debug!(
                event_name = "extraction.completed",
                search_term = extracted.search_term.as_deref().unwrap_or_default(),
                category = extracted.category.as_deref().unwrap_or_default(),
                min_price = extracted.min_price,
                max_price = extracted.max_price,
                sort_by = extracted.sort_by.as_ref().map(|sort| sort.as_str()).unwrap_or_default(),
                "extracted filters from message"
            );
        }
        extracted
    }
}
