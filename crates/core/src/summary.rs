//! Human-readable description of the active filters, as shown above the
//! product grid.

use serde::Serialize;

use crate::domain::filters::FilterState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChipKind {
    Search,
    Category,
    MaxPrice,
    MinPrice,
    Sort,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub kind: ChipKind,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub filtered: bool,
    pub headline: &'static str,
    pub counts: String,
    pub chips: Vec<FilterChip>,
    pub sort_label: Option<&'static str>,
}

impl FilterSummary {
    /// `total` is the catalog size, `shown` the number left after filtering.
    pub fn describe(filters: &FilterState, total: usize, shown: usize) -> Self {
        let filtered = !filters.is_empty();
        Self {
            filtered,
            headline: if filtered { "Filtered Results" } else { "All Products" },
            counts: format!("Showing {shown} of {total} products"),
            chips: chips(filters),
            sort_label: filters.sort_by.as_ref().and_then(|sort| sort.label()),
        }
    }
}

fn chips(filters: &FilterState) -> Vec<FilterChip> {
    let mut chips = Vec::new();
    if let Some(term) = &filters.search_term {
        chips.push(FilterChip { kind: ChipKind::Search, label: format!("Search: \"{term}\"") });
    }
    if let Some(category) = &filters.category {
        chips.push(FilterChip { kind: ChipKind::Category, label: format!("Category: {category}") });
    }
    if let Some(max) = filters.max_price {
        chips.push(FilterChip { kind: ChipKind::MaxPrice, label: format!("Up to ₹{}", format_inr(max)) });
    }
    if let Some(min) = filters.min_price {
        chips.push(FilterChip { kind: ChipKind::MinPrice, label: format!("From ₹{}", format_inr(min)) });
    }
    if let Some(label) = filters.sort_by.as_ref().and_then(|sort| sort.label()) {
        chips.push(FilterChip { kind: ChipKind::Sort, label: label.to_string() });
    }
    chips
}

/// Formats an amount with Indian digit grouping: the last three digits, then
/// pairs (`12,34,567`).
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
