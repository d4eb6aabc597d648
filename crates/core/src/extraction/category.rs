use once_cell::sync::Lazy;

use super::rules::{first_match, longest_first, plural_keyword_rule, PatternRule};

pub const SMART_HOME: &str = "smart-home";
pub const HOME_SECURITY: &str = "home-security";
pub const ELECTRONICS: &str = "electronics";

/// Keyword to catalog category. Several keywords share a category; ties in
/// keyword length keep the order below. Plural forms match their keyword.
static CATEGORY_RULES: Lazy<Vec<PatternRule<&'static str>>> = Lazy::new(|| {
    longest_first(vec![
        plural_keyword_rule("smart home", SMART_HOME),
        plural_keyword_rule("smart-home", SMART_HOME),
        plural_keyword_rule("smart home devices", SMART_HOME),
        plural_keyword_rule("smart devices", SMART_HOME),
        plural_keyword_rule("home automation", SMART_HOME),
        plural_keyword_rule("automation", SMART_HOME),
        plural_keyword_rule("smart lighting", SMART_HOME),
        plural_keyword_rule("smart thermostat", SMART_HOME),
        plural_keyword_rule("smart plug", SMART_HOME),
        plural_keyword_rule("smart switch", SMART_HOME),
        plural_keyword_rule("smart lock", SMART_HOME),
        plural_keyword_rule("hue", SMART_HOME),
        plural_keyword_rule("philips hue", SMART_HOME),
        plural_keyword_rule("nest", SMART_HOME),
        plural_keyword_rule("thermostat", SMART_HOME),
        plural_keyword_rule("home security", HOME_SECURITY),
        plural_keyword_rule("home-security", HOME_SECURITY),
        plural_keyword_rule("security", HOME_SECURITY),
        plural_keyword_rule("security camera", HOME_SECURITY),
        plural_keyword_rule("security cameras", HOME_SECURITY),
        plural_keyword_rule("camera", HOME_SECURITY),
        plural_keyword_rule("cameras", HOME_SECURITY),
        plural_keyword_rule("doorbell", HOME_SECURITY),
        plural_keyword_rule("doorbells", HOME_SECURITY),
        plural_keyword_rule("alarm", HOME_SECURITY),
        plural_keyword_rule("alarms", HOME_SECURITY),
        plural_keyword_rule("ring", HOME_SECURITY),
        plural_keyword_rule("blink", HOME_SECURITY),
        plural_keyword_rule("wyze", HOME_SECURITY),
        plural_keyword_rule("electronics", ELECTRONICS),
        plural_keyword_rule("electronic", ELECTRONICS),
        plural_keyword_rule("smartphone", ELECTRONICS),
        plural_keyword_rule("phone", ELECTRONICS),
        plural_keyword_rule("tablet", ELECTRONICS),
        plural_keyword_rule("laptop", ELECTRONICS),
        plural_keyword_rule("speaker", ELECTRONICS),
        plural_keyword_rule("speakers", ELECTRONICS),
        plural_keyword_rule("audio", ELECTRONICS),
        plural_keyword_rule("headphone", ELECTRONICS),
        plural_keyword_rule("earbuds", ELECTRONICS),
        plural_keyword_rule("earbud", ELECTRONICS),
        plural_keyword_rule("echo", ELECTRONICS),
        plural_keyword_rule("kindle", ELECTRONICS),
        plural_keyword_rule("fire", ELECTRONICS),
        plural_keyword_rule("roku", ELECTRONICS),
        plural_keyword_rule("streaming", ELECTRONICS),
        plural_keyword_rule("e-reader", ELECTRONICS),
        plural_keyword_rule("ereader", ELECTRONICS),
    ])
});

pub fn extract_category(text: &str) -> Option<&'static str> {
    let rule = first_match(&CATEGORY_RULES, text)?;
    tracing::debug!(
        event_name = "extraction.category",
        keyword = rule.name,
        category = rule.value,
        "mapped keyword to category"
    );
    Some(rule.value)
}
