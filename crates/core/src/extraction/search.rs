//! Search-term extraction in three tiers: known category keywords, intent
//! phrases ("looking for X"), then known product names.

use once_cell::sync::Lazy;
use regex::Regex;

use super::intent::{has_search_intent, is_product_listing};
use super::rules::{first_match, keyword_rule, longest_first, PatternRule};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchTier {
    Keyword,
    Intent,
    ProductName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchMatch {
    pub term: String,
    pub tier: SearchTier,
}

static KEYWORD_RULES: Lazy<Vec<PatternRule<()>>> = Lazy::new(|| {
    longest_first(
        [
            "cameras",
            "camera",
            "speakers",
            "speaker",
            "tablets",
            "tablet",
            "doorbells",
            "doorbell",
            "security systems",
            "security system",
            "security",
            "smart home",
            "smart homes",
            "lighting",
            "lights",
            "thermostats",
            "thermostat",
            "locks",
            "lock",
            "switches",
            "switch",
            "e-readers",
            "e-reader",
            "ereaders",
            "ereader",
            "echo",
            "echoes",
        ]
        .into_iter()
        .map(|keyword| keyword_rule(keyword, ()))
        .collect(),
    )
});

static PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:here are (?:some|all|the)\s+|i have (?:found|removed|updated|set)\s+|i found\s+|these are\s+|here (?:is|are)\s+)",
    )
    .expect("preamble pattern compiles")
});

static INTENT_RULES: Lazy<Vec<PatternRule<()>>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            "intent_verb",
            r"(?i)\b(?:show me|find|search for|looking for|i want|i need|get me|display|show|list|browse|i asked for|asked for|i'm looking for)\s+([^,.!?]+)",
            (),
        ),
        PatternRule::new(
            "noun_products",
            r"(?i)\b([a-z]+(?:\s+[a-z]+){0,2})\s+(?:products?|items?|devices?|gadgets?)\b",
            (),
        ),
        PatternRule::new(
            "named_like",
            r"(?i)(?:products?|items?|cameras?)\s+(?:called|named|like|such as|including)\s+([^,.!?]+)",
            (),
        ),
    ]
});

static LEADING_FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:here are|here is|i have|i found|these are|some|all|the|a|an)\s+")
        .expect("leading filler pattern compiles")
});

static TRAILING_QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:under|below|above|between|sorted|by|in|from|with|that|which)\b.*$")
        .expect("trailing qualifier pattern compiles")
});

static PRICE_OR_FILLER_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:₹|(?:under|below|above|between|rs|inr|sort|price|category|here|some|all|the)\b|\d)")
        .expect("price token pattern compiles")
});

static LINKING_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s(?:are|is|have|found)\s").expect("linking verb pattern compiles"));

/// Leftovers of "show you all ..." or a split contraction ("here's every").
static PRONOUN_OR_QUANTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:you|me|us|it|them|s)\b|\b(?:all|every)\b").expect("pronoun pattern compiles")
});

static BRAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:blink|ring|echo|kindle|fire|wyze|philips|nest|roku|smart)\b")
        .expect("brand pattern compiles")
});

/// Known product names, specific names before the brand alone.
const PRODUCT_NAMES: &[&str] = &[
    "echo dot",
    "echo show",
    "echo studio",
    "echo buds",
    "kindle paperwhite",
    "kindle oasis",
    "kindle",
    "fire tv stick",
    "fire tv cube",
    "fire tv",
    "fire tablet",
    "ring doorbell",
    "ring floodlight",
    "ring alarm",
    "blink outdoor",
    "blink mini",
    "blink",
    "wyze cam",
    "wyze",
    "philips hue",
    "philips",
    "smart plug",
    "smart lock",
    "smart switch",
    "nest thermostat",
    "nest",
    "roku",
];

const MAX_TERM_CHARS: usize = 30;
const MAX_TERM_WORDS: usize = 3;

/// Runs the tiers in order over lowercased text and returns the first hit.
pub fn extract_search_term(text: &str) -> Option<SearchMatch> {
    keyword_term(text)
        .map(|term| SearchMatch { term, tier: SearchTier::Keyword })
        .or_else(|| intent_term(text).map(|term| SearchMatch { term, tier: SearchTier::Intent }))
        .or_else(|| product_name_term(text).map(|term| SearchMatch { term, tier: SearchTier::ProductName }))
}

fn keyword_term(text: &str) -> Option<String> {
    first_match(&KEYWORD_RULES, text).map(|rule| rule.name.to_string())
}

fn intent_term(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let remainder = PREAMBLE.replace(trimmed, "");
    let listing = is_product_listing(text);

    INTENT_RULES.iter().find_map(|rule| {
        let captured = rule.pattern.captures(&remainder)?.get(1)?.as_str();
        let term = clean_term(captured);
        if is_plausible_term(&term, listing) {
            tracing::debug!(
                event_name = "extraction.search.intent",
                rule = rule.name,
                search_term = %term,
                "captured search term from intent phrase"
            );
            Some(term)
        } else {
            tracing::trace!(
                event_name = "extraction.search.rejected",
                rule = rule.name,
                candidate = %term,
                "rejected search term candidate"
            );
            None
        }
    })
}

fn product_name_term(text: &str) -> Option<String> {
    if is_product_listing(text) || !has_search_intent(text) {
        return None;
    }
    PRODUCT_NAMES.iter().find(|name| text.contains(**name)).map(|name| (*name).to_string())
}

fn clean_term(captured: &str) -> String {
    let trimmed = captured.trim();
    let without_lead = LEADING_FILLER.replace(trimmed, "");
    TRAILING_QUALIFIER.replace(&without_lead, "").trim().to_string()
}

fn is_plausible_term(term: &str, listing: bool) -> bool {
    let chars = term.chars().count();
    if chars <= 2 || chars >= MAX_TERM_CHARS {
        return false;
    }
    if term.split_whitespace().count() > MAX_TERM_WORDS {
        return false;
    }
    if PRICE_OR_FILLER_START.is_match(term) || LINKING_VERB.is_match(term) {
        return false;
    }
    if PRONOUN_OR_QUANTIFIER.is_match(term) {
        return false;
    }
    !(listing && BRAND.is_match(term))
}
