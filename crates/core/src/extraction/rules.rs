use std::cmp::Reverse;

use regex::Regex;

/// One row of an ordered matching table. Tables are scanned top to bottom and
/// the first row whose pattern matches wins.
#[derive(Clone, Debug)]
pub struct PatternRule<T> {
    pub name: &'static str,
    pub pattern: Regex,
    pub value: T,
}

impl<T> PatternRule<T> {
    /// Built-in tables are compiled from literals covered by unit tests, so a
    /// compile failure is a programming error.
    pub fn new(name: &'static str, pattern: &str, value: T) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|error| panic!("built-in pattern `{name}` does not compile: {error}"));
        Self { name, pattern, value }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

pub fn first_match<'a, T>(rules: &'a [PatternRule<T>], text: &str) -> Option<&'a PatternRule<T>> {
    rules.iter().find(|rule| rule.is_match(text))
}

/// Whole-word, case-insensitive rule for a literal keyword.
pub fn keyword_rule<T>(keyword: &'static str, value: T) -> PatternRule<T> {
    PatternRule::new(keyword, &format!(r"(?i)\b{}\b", regex::escape(keyword)), value)
}

/// Like [`keyword_rule`], but also accepts a plural tail ("tablets",
/// "echoes"). The leading boundary still keeps "ring" out of "during".
pub fn plural_keyword_rule<T>(keyword: &'static str, value: T) -> PatternRule<T> {
    PatternRule::new(keyword, &format!(r"(?i)\b{}(?:s|es)?\b", regex::escape(keyword)), value)
}

/// Orders keyword rows longest keyword first. The sort is stable, so rows of
/// equal length keep their table order.
pub fn longest_first<T>(mut rules: Vec<PatternRule<T>>) -> Vec<PatternRule<T>> {
    rules.sort_by_key(|rule| Reverse(rule.name.chars().count()));
    rules
}
