//! Whole-message classifiers used by the extractor.

use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::{first_match, PatternRule};

pub(crate) static SHOW_ALL_RULES: Lazy<Vec<PatternRule<()>>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            "show_all_verb",
            r"(?i)\b(?:show|display|list|see|view|get|find)\s+(?:(?:me|you|us)\s+)?(?:all|every|each)\s+(?:the\s+)?(?:products?|items?|things?)\b",
            (),
        ),
        // "I found 22 products." A bare two-digit count of generic products,
        // ending the sentence, is a full listing; "I found 4 cameras" is not.
        PatternRule::new(
            "found_many_products",
            r"(?i)\b(?:i\s+)?found\s+\d{2,}\s+products?\s*[.!?]$",
            (),
        ),
        PatternRule::new(
            "here_are_all",
            r"(?i)\bhere\s+are\s+(?:all\s+(?:of\s+)?(?:the\s+|our\s+)?|the\s+)(?:products?|items?)\b",
            (),
        ),
        PatternRule::new("showing_all", r"(?i)\bshowing\s+(?:all|every)\s+(?:products?|items?)\b", ()),
        PatternRule::new("all_generic", r"(?i)\b(?:all|every)\s+(?:products?|items?|things?)\b", ()),
    ]
});

static PRODUCT_LISTING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\bfound|\bhere are|\bshowing|\bthese are|\bproducts?:|\bitems?:)\s+[^.!?]*(?:echo|kindle|fire|ring|blink|wyze|philips|smart|nest|roku)",
    )
    .expect("product listing pattern compiles")
});

static SEARCH_INTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:show|find|looking|search|want|need|asked)").expect("search intent pattern compiles")
});

/// Returns the name of the first "show everything" rule the text matches.
pub fn show_all_rule(text: &str) -> Option<&'static str> {
    first_match(&SHOW_ALL_RULES, text.trim()).map(|rule| rule.name)
}

/// Heuristic: the agent is enumerating results ("I found the Echo Dot and ...")
/// rather than restating what the user asked for. Listing verbs must be
/// followed, within the same sentence, by a brand token.
pub fn is_product_listing(text: &str) -> bool {
    PRODUCT_LISTING.is_match(text)
}

/// The text carries a verb that signals the user asked for something.
pub fn has_search_intent(text: &str) -> bool {
    SEARCH_INTENT.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::{has_search_intent, is_product_listing, show_all_rule};

    #[test]
    fn show_all_verb_row() {
        assert_eq!(show_all_rule("Show me all products"), Some("show_all_verb"));
        assert_eq!(show_all_rule("Let me display every item we carry."), Some("show_all_verb"));
        assert_eq!(show_all_rule("I'll show you all products."), Some("show_all_verb"));
        assert_eq!(show_all_rule("Let me show you all the products."), Some("show_all_verb"));
        assert_eq!(show_all_rule("We can show us every item."), Some("show_all_verb"));
    }

    #[test]
    fn all_generic_row_needs_a_generic_noun() {
        assert_eq!(
            show_all_rule("Sure, here's every product we carry. All products are listed."),
            Some("all_generic")
        );
        assert_eq!(show_all_rule("All items are back in stock!"), Some("all_generic"));
        assert_eq!(show_all_rule("Here are all cameras under 5000."), None);
        assert_eq!(show_all_rule("Every speaker here is wireless."), None);
    }

    #[test]
    fn found_many_products_row_requires_two_digits_and_generic_noun() {
        assert_eq!(show_all_rule("I found 22 products."), Some("found_many_products"));
        assert_eq!(show_all_rule("I found 4 products."), None);
        assert_eq!(show_all_rule("I found 12 cameras."), None);
        assert_eq!(show_all_rule("I found 22 products under 5000."), None);
        assert_eq!(show_all_rule("I found 22 products?"), Some("found_many_products"));
        assert_eq!(show_all_rule("I found 22 products"), None);
    }

    #[test]
    fn here_are_all_row() {
        assert_eq!(show_all_rule("Here are all the products we have"), Some("here_are_all"));
        assert_eq!(show_all_rule("Here are the products in the store"), Some("here_are_all"));
        assert_eq!(show_all_rule("Here are some products you might like"), None);
    }

    #[test]
    fn showing_all_row() {
        assert_eq!(show_all_rule("Now showing all items."), Some("showing_all"));
    }

    #[test]
    fn listing_classifier_needs_listing_verb_and_brand() {
        assert!(is_product_listing("I found the Echo Dot and the Echo Show for you."));
        assert!(is_product_listing("Here are two options: Blink Mini and Wyze Cam."));
        assert!(!is_product_listing("Can you show me an echo?"));
        assert!(!is_product_listing("I found nothing. The Echo is out of stock."));
    }

    #[test]
    fn search_intent_classifier() {
        assert!(has_search_intent("You asked for a kindle"));
        assert!(has_search_intent("Looking for the Fire TV?"));
        assert!(!has_search_intent("The Kindle Oasis costs 27999 rupees."));
    }
}
