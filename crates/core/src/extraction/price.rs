//! Price bound extraction: explicit ranges first, then upper and lower bounds.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::rules::PatternRule;

const CURRENCY: &str = r"(?:₹|\b(?:rs\.?|inr|rupees?)\b\.?)";
const AMOUNT: &str = r"(\d+(?:,\d+)*(?:\.\d+)?)";
const SCALE: &str = r"(?:thousand|k|000|grand)?";

/// Characters inspected on each side of a match for a "thousand" hint.
const CONTEXT_RADIUS: usize = 20;

static THOUSAND_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:thousand|grand|k)\b|\d\s*k\b").expect("thousand hint pattern compiles")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceBound {
    Range,
    Max,
    Min,
}

pub(crate) static RANGE_RULES: Lazy<Vec<PatternRule<PriceBound>>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            "between_and",
            &format!(
                r"(?i)\bbetween\s*{CURRENCY}?\s*{AMOUNT}\s*{SCALE}\s*(?:and|to|-)\s*{CURRENCY}?\s*{AMOUNT}\s*{SCALE}"
            ),
            PriceBound::Range,
        ),
        PatternRule::new(
            "from_to",
            &format!(
                r"(?i)\bfrom\s*{CURRENCY}?\s*{AMOUNT}\s*{SCALE}\s*(?:to|-)\s*{CURRENCY}?\s*{AMOUNT}\s*{SCALE}"
            ),
            PriceBound::Range,
        ),
        PatternRule::new(
            "currency_to",
            &format!(
                r"(?i){CURRENCY}\s*{AMOUNT}\s*{SCALE}\s*(?:to|-|and)\s*{CURRENCY}?\s*{AMOUNT}\s*{SCALE}"
            ),
            PriceBound::Range,
        ),
    ]
});

pub(crate) static MAX_RULES: Lazy<Vec<PatternRule<PriceBound>>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            "max_keyword",
            &format!(
                r"(?i)\b(?:under|below|less than|up to|maximum price of|maximum|max|cheaper than|lower than)\s*{CURRENCY}?\s*{AMOUNT}\s*{SCALE}"
            ),
            PriceBound::Max,
        ),
        PatternRule::new(
            "max_suffix",
            &format!(r"(?i){CURRENCY}\s*{AMOUNT}\s*{SCALE}\s*(?:or less|and below|and under)"),
            PriceBound::Max,
        ),
    ]
});

pub(crate) static MIN_RULES: Lazy<Vec<PatternRule<PriceBound>>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            "min_keyword",
            &format!(
                r"(?i)\b(?:above|more than|at least|minimum price of|minimum|min|starting from|from|greater than)\s*{CURRENCY}?\s*{AMOUNT}\s*{SCALE}"
            ),
            PriceBound::Min,
        ),
        PatternRule::new(
            "min_suffix",
            &format!(r"(?i){CURRENCY}\s*{AMOUNT}\s*{SCALE}\s*(?:or more|and above|and up)"),
            PriceBound::Min,
        ),
    ]
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

/// Extracts price bounds from lowercased text. A matched range wins outright;
/// otherwise the first usable upper and lower bound rows apply independently.
/// When both bounds are present the smaller one is always the minimum.
pub fn extract_price_bounds(text: &str) -> PriceBounds {
    if let Some((min, max)) = extract_range(text) {
        return PriceBounds { min: Some(min), max: Some(max) };
    }

    let max = extract_single(&MAX_RULES, text);
    let min = extract_single(&MIN_RULES, text);
    match (min, max) {
        (Some(low), Some(high)) if low > high => PriceBounds { min: Some(high), max: Some(low) },
        _ => PriceBounds { min, max },
    }
}

fn extract_range(text: &str) -> Option<(u64, u64)> {
    for rule in RANGE_RULES.iter() {
        let Some(captures) = rule.pattern.captures(text) else {
            continue;
        };
        let (Some(first), Some(second)) = (parse_number(&captures, 1), parse_number(&captures, 2))
        else {
            continue;
        };

        let scale = if has_thousand_hint(text, &captures) && first < 1000.0 && second < 1000.0 {
            1000.0
        } else {
            1.0
        };
        let (Some(first), Some(second)) = (to_price(first * scale), to_price(second * scale))
        else {
            continue;
        };

        tracing::debug!(
            event_name = "extraction.price.range",
            rule = rule.name,
            min_price = first.min(second),
            max_price = first.max(second),
            "extracted price range"
        );
        return Some((first.min(second), first.max(second)));
    }
    None
}

fn extract_single(rules: &[PatternRule<PriceBound>], text: &str) -> Option<u64> {
    for rule in rules {
        let Some(captures) = rule.pattern.captures(text) else {
            continue;
        };
        let Some(value) = parse_number(&captures, 1) else {
            continue;
        };

        let scaled =
            if has_thousand_hint(text, &captures) && value < 1000.0 { value * 1000.0 } else { value };
        if let Some(price) = to_price(scaled) {
            tracing::debug!(
                event_name = "extraction.price.bound",
                rule = rule.name,
                bound = ?rule.value,
                price,
                "extracted price bound"
            );
            return Some(price);
        }
    }
    None
}

fn parse_number(captures: &Captures<'_>, group: usize) -> Option<f64> {
    let raw = captures.get(group)?.as_str().replace(',', "");
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn to_price(value: f64) -> Option<u64> {
    let whole = value.trunc();
    (whole >= 1.0 && whole < u64::MAX as f64).then_some(whole as u64)
}

fn has_thousand_hint(text: &str, captures: &Captures<'_>) -> bool {
    let Some(whole) = captures.get(0) else {
        return false;
    };
    THOUSAND_HINT.is_match(context_window(text, whole.start(), whole.end(), CONTEXT_RADIUS))
}

/// Slice of `text` covering `start..end` widened by up to `radius` characters
/// on each side.
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = if radius == 0 {
        start
    } else {
        text[..start].char_indices().rev().nth(radius - 1).map(|(index, _)| index).unwrap_or(0)
    };
    let to = text[end..].char_indices().nth(radius).map(|(index, _)| end + index).unwrap_or(text.len());
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::{context_window, extract_price_bounds, PriceBounds, MAX_RULES, MIN_RULES, RANGE_RULES};

    fn bounds(text: &str) -> PriceBounds {
        extract_price_bounds(&text.to_lowercase())
    }

    fn rule_names_matching(rules: &[super::PatternRule<super::PriceBound>], text: &str) -> Vec<&'static str> {
        rules.iter().filter(|rule| rule.is_match(text)).map(|rule| rule.name).collect()
    }

    #[test]
    fn range_rows_each_match_their_phrasing() {
        assert_eq!(rule_names_matching(&RANGE_RULES, "between 3000 and 8000"), vec!["between_and"]);
        assert_eq!(rule_names_matching(&RANGE_RULES, "from 2,000 to 5,000"), vec!["from_to"]);
        assert_eq!(rule_names_matching(&RANGE_RULES, "₹2000 to ₹5000"), vec!["currency_to"]);
    }

    #[test]
    fn max_rows_each_match_their_phrasing() {
        assert_eq!(rule_names_matching(&MAX_RULES, "anything under ₹5000"), vec!["max_keyword"]);
        assert_eq!(rule_names_matching(&MAX_RULES, "rs. 5000 or less"), vec!["max_suffix"]);
    }

    #[test]
    fn min_rows_each_match_their_phrasing() {
        assert_eq!(rule_names_matching(&MIN_RULES, "at least 2000"), vec!["min_keyword"]);
        assert_eq!(rule_names_matching(&MIN_RULES, "inr 2000 and above"), vec!["min_suffix"]);
    }

    #[test]
    fn reversed_range_is_normalized() {
        assert_eq!(bounds("Something between 8000 and 3000"), PriceBounds { min: Some(3000), max: Some(8000) });
    }

    #[test]
    fn thousand_word_multiplies_small_numbers() {
        assert_eq!(bounds("cameras under 10 thousand").max, Some(10_000));
        assert_eq!(bounds("under 10k please").max, Some(10_000));
        assert_eq!(bounds("under 5 grand").max, Some(5_000));
    }

    #[test]
    fn large_numbers_are_not_multiplied_again() {
        assert_eq!(bounds("under 10000").max, Some(10_000));
        assert_eq!(bounds("under 10,000 thousand").max, Some(10_000));
    }

    #[test]
    fn thousand_multiplier_applies_to_both_range_ends() {
        assert_eq!(bounds("between 5 and 10 thousand"), PriceBounds { min: Some(5_000), max: Some(10_000) });
    }

    #[test]
    fn range_supersedes_single_bounds() {
        assert_eq!(
            bounds("Show me speakers from ₹2,999 to ₹7,999 under 9000"),
            PriceBounds { min: Some(2999), max: Some(7999) }
        );
    }

    #[test]
    fn independent_bounds_are_swapped_when_reversed() {
        assert_eq!(bounds("above 9000 and below 4000"), PriceBounds { min: Some(4000), max: Some(9000) });
    }

    #[test]
    fn zero_and_missing_amounts_are_discarded() {
        assert_eq!(bounds("under 0 rupees"), PriceBounds::default());
        assert_eq!(bounds("nothing about price here"), PriceBounds::default());
    }

    #[test]
    fn fractional_amounts_truncate() {
        assert_eq!(bounds("under 4999.99").max, Some(4999));
        assert_eq!(bounds("under 2.5k").max, Some(2500));
    }

    #[test]
    fn context_window_respects_multibyte_characters() {
        let text = "₹₹₹ under 5 ₹₹₹";
        let start = text.find("under").expect("fixture");
        let window = context_window(text, start, start + "under 5".len(), 2);
        assert_eq!(window, "₹ under 5 ₹");
    }
}
