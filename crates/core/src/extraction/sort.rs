use once_cell::sync::Lazy;

use super::rules::{first_match, PatternRule};
use crate::domain::filters::SortOrder;

const VERB: &str = r"\b(?:sort|sorted|sorting|order|ordered|arrange|arranged|organize|organized|show)\b";
const BY: &str = r"\b(?:by|according to)\b";

/// Directional rows come before bare synonyms, so "sort by price high to low"
/// is decided by its explicit direction even when "cheapest" appears later.
/// A direction after "price" counts without a sort verb.
static SORT_RULES: Lazy<Vec<PatternRule<SortOrder>>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            "by_price_ascending",
            &format!(
                r"(?i){VERB}.*?{BY}.*?\b(?:price|cost)\b.*?\b(?:low(?:est)?\s+to\s+high(?:est)?|ascending|asc|cheapest first|lowest first|increasing)\b"
            ),
            SortOrder::PriceAsc,
        ),
        PatternRule::new(
            "by_price_descending",
            &format!(
                r"(?i){VERB}.*?{BY}.*?\b(?:price|cost)\b.*?\b(?:high(?:est)?\s+to\s+low(?:est)?|descending|desc|most expensive first|highest first|decreasing)\b"
            ),
            SortOrder::PriceDesc,
        ),
        PatternRule::new(
            "price_low_to_high",
            r"(?i)\b(?:price|cost)\b.*?\blow(?:est)?\s+to\s+high(?:est)?\b",
            SortOrder::PriceAsc,
        ),
        PatternRule::new(
            "price_high_to_low",
            r"(?i)\b(?:price|cost)\b.*?\bhigh(?:est)?\s+to\s+low(?:est)?\b",
            SortOrder::PriceDesc,
        ),
        PatternRule::new(
            "cheapest",
            r"(?i)\b(?:cheapest|lowest price|low price|least expensive|lowest priced)\b",
            SortOrder::PriceAsc,
        ),
        PatternRule::new(
            "most_expensive",
            r"(?i)\b(?:most expensive|highest price|high price|priciest|highest priced)\b",
            SortOrder::PriceDesc,
        ),
        PatternRule::new(
            "by_rating",
            &format!(r"(?i){VERB}.*?{BY}.*?\b(?:ratings?|rated|stars?|reviews?)\b"),
            SortOrder::RatingDesc,
        ),
        PatternRule::new(
            "top_rated",
            r"(?i)\b(?:highest rated|best rated|top rated|highest rating|most reviews|highest reviews|best reviewed)\b",
            SortOrder::RatingDesc,
        ),
        PatternRule::new(
            "by_name_ascending",
            &format!(r"(?i){VERB}.*?{BY}.*?\b(?:name|alphabetical|alphabet)\b.*?\b(?:a to z|ascending|asc)\b"),
            SortOrder::NameAsc,
        ),
        PatternRule::new(
            "by_name_descending",
            &format!(r"(?i){VERB}.*?{BY}.*?\b(?:name|alphabetical|alphabet)\b.*?\b(?:z to a|descending|desc)\b"),
            SortOrder::NameDesc,
        ),
        PatternRule::new("reverse_alphabetical", r"(?i)\b(?:reverse alphabetical(?:ly)?|z to a)\b", SortOrder::NameDesc),
        PatternRule::new("alphabetical", r"(?i)\b(?:alphabetically|alphabetical order|a to z)\b", SortOrder::NameAsc),
    ]
});

pub fn extract_sort(text: &str) -> Option<SortOrder> {
    let rule = first_match(&SORT_RULES, text)?;
    tracing::debug!(
        event_name = "extraction.sort",
        rule = rule.name,
        sort_by = rule.value.as_str(),
        "extracted sort order"
    );
    Some(rule.value.clone())
}
