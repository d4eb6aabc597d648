use std::cmp::Ordering;

use crate::domain::filters::{FilterState, SortOrder};
use crate::domain::product::Product;

/// Applies a [`FilterState`] to a catalog snapshot.
///
/// Constraints are ANDed. Sorting runs after filtering and is stable, so ties
/// keep catalog order. The input slice is never reordered.
#[derive(Clone, Debug, Default)]
pub struct ProductFilterEngine;

impl ProductFilterEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, catalog: &[Product], filters: &FilterState) -> Vec<Product> {
        let needle = filters.search_term.as_deref().map(str::trim).filter(|term| !term.is_empty());
        let variants = needle.map(search_variants).unwrap_or_default();

        let mut matched: Vec<Product> = catalog
            .iter()
            .filter(|product| variants.is_empty() || matches_search(product, &variants))
            .filter(|product| {
                filters
                    .category
                    .as_deref()
                    .map_or(true, |category| product.category.eq_ignore_ascii_case(category.trim()))
            })
            .filter(|product| filters.max_price.map_or(true, |max| product.price <= max))
            .filter(|product| filters.min_price.map_or(true, |min| product.price >= min))
            .cloned()
            .collect();

        if let Some(sort_by) = &filters.sort_by {
            sort_products(&mut matched, sort_by);
        }
        matched
    }
}

/// The term itself plus its naive singular/plural twin, all lowercased.
fn search_variants(term: &str) -> Vec<String> {
    let lowered = term.to_lowercase();
    let twin = match lowered.strip_suffix('s') {
        Some(singular) if !singular.is_empty() => singular.to_string(),
        Some(_) => return vec![lowered],
        None => format!("{lowered}s"),
    };
    vec![lowered, twin]
}

fn matches_search(product: &Product, variants: &[String]) -> bool {
    let fields = [product.name.to_lowercase(), product.description.to_lowercase(), product.category.to_lowercase()];
    variants.iter().any(|variant| fields.iter().any(|field| field.contains(variant.as_str())))
}

fn sort_products(products: &mut [Product], sort_by: &SortOrder) {
    match sort_by {
        SortOrder::PriceAsc => products.sort_by_key(|product| product.price),
        SortOrder::PriceDesc => products.sort_by(|left, right| right.price.cmp(&left.price)),
        SortOrder::RatingDesc => products.sort_by(|left, right| right.rating.total_cmp(&left.rating)),
        SortOrder::NameAsc => products.sort_by(|left, right| compare_names(&left.name, &right.name)),
        SortOrder::NameDesc => products.sort_by(|left, right| compare_names(&right.name, &left.name)),
        SortOrder::Unrecognized(value) => {
            tracing::warn!(
                event_name = "engine.sort.unrecognized",
                sort_by = %value,
                "unknown sort order, keeping catalog order"
            );
        }
    }
}

/// Case-insensitive first, raw text as the tie-breaker, which keeps
/// "echo" and "Echo" in a deterministic order.
fn compare_names(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase()).then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::ProductFilterEngine;
    use crate::domain::filters::{FilterState, SortOrder};
    use crate::domain::product::fixtures::{product, small_catalog};
    use crate::domain::product::Product;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|product| product.id.as_str()).collect()
    }

    #[test]
    fn empty_filters_return_catalog_unchanged() {
        let catalog = small_catalog();
        let result = ProductFilterEngine::new().apply(&catalog, &FilterState::default());
        assert_eq!(result, catalog);
    }

    #[test]
    fn search_matches_plural_and_singular_forms() {
        let catalog = small_catalog();
        let engine = ProductFilterEngine::new();

        let plural = FilterState { search_term: Some("Cameras".to_string()), ..FilterState::default() };
        assert_eq!(ids(&engine.apply(&catalog, &plural)), vec!["blink-mini", "blink-outdoor"]);

        let singular = FilterState { search_term: Some("bulb".to_string()), ..FilterState::default() };
        assert_eq!(ids(&engine.apply(&catalog, &singular)), vec!["philips-hue"]);
    }

    #[test]
    fn search_also_matches_category_slug() {
        let catalog = small_catalog();
        let filters = FilterState { search_term: Some("smart-home".to_string()), ..FilterState::default() };
        assert_eq!(ids(&ProductFilterEngine::new().apply(&catalog, &filters)), vec!["smart-plug", "philips-hue"]);
    }

    #[test]
    fn constraints_are_anded() {
        let catalog = small_catalog();
        let filters = FilterState {
            category: Some("HOME-SECURITY".to_string()),
            min_price: Some(3000),
            max_price: Some(9999),
            ..FilterState::default()
        };
        assert_eq!(ids(&ProductFilterEngine::new().apply(&catalog, &filters)), vec!["ring-doorbell", "blink-outdoor"]);
    }

    #[test]
    fn inverted_bounds_match_nothing() {
        let catalog = small_catalog();
        let filters = FilterState { min_price: Some(5000), max_price: Some(2000), ..FilterState::default() };
        assert!(ProductFilterEngine::new().apply(&catalog, &filters).is_empty());
    }

    #[test]
    fn sorts_by_each_order() {
        let catalog = small_catalog();
        let engine = ProductFilterEngine::new();
        let sorted = |sort_by: SortOrder| {
            let filters = FilterState { sort_by: Some(sort_by), ..FilterState::default() };
            engine.apply(&catalog, &filters).into_iter().map(|product| product.id.0).collect::<Vec<_>>()
        };

        assert_eq!(sorted(SortOrder::PriceAsc).first().map(String::as_str), Some("smart-plug"));
        assert_eq!(sorted(SortOrder::PriceDesc).first().map(String::as_str), Some("kindle-oasis"));
        assert_eq!(sorted(SortOrder::RatingDesc).first().map(String::as_str), Some("kindle-oasis"));
        assert_eq!(sorted(SortOrder::NameAsc).first().map(String::as_str), Some("blink-mini"));
        assert_eq!(sorted(SortOrder::NameDesc).first().map(String::as_str), Some("smart-plug"));
    }

    #[test]
    fn equal_keys_keep_catalog_order() {
        let catalog = vec![
            product("b", "Second", 500, "electronics", 4.0),
            product("a", "First", 500, "electronics", 4.0),
            product("c", "Third", 100, "electronics", 4.0),
        ];
        let engine = ProductFilterEngine::new();

        let by_price = FilterState { sort_by: Some(SortOrder::PriceAsc), ..FilterState::default() };
        assert_eq!(ids(&engine.apply(&catalog, &by_price)), vec!["c", "b", "a"]);

        let by_rating = FilterState { sort_by: Some(SortOrder::RatingDesc), ..FilterState::default() };
        assert_eq!(ids(&engine.apply(&catalog, &by_rating)), vec!["b", "a", "c"]);
    }

    #[test]
    fn unknown_sort_is_a_no_op() {
        let catalog = small_catalog();
        let filters =
            FilterState { sort_by: Some(SortOrder::Unrecognized("popularity".to_string())), ..FilterState::default() };
        assert_eq!(ProductFilterEngine::new().apply(&catalog, &filters), catalog);
    }

    #[test]
    fn result_is_a_subset_and_reapplying_is_stable() {
        let catalog = small_catalog();
        let engine = ProductFilterEngine::new();
        let states = [
            FilterState { search_term: Some("camera".to_string()), ..FilterState::default() },
            FilterState { max_price: Some(6000), sort_by: Some(SortOrder::NameDesc), ..FilterState::default() },
            FilterState {
                category: Some("electronics".to_string()),
                min_price: Some(1),
                sort_by: Some(SortOrder::PriceDesc),
                ..FilterState::default()
            },
            FilterState { search_term: Some("s".to_string()), ..FilterState::default() },
        ];

        for filters in states {
            let once = engine.apply(&catalog, &filters);
            assert!(once.iter().all(|product| catalog.contains(product)), "filters: {filters:?}");
            assert_eq!(engine.apply(&once, &filters), once, "filters: {filters:?}");
        }
    }
}
