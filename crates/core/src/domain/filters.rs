use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    RatingDesc,
    NameAsc,
    NameDesc,
    /// A value sent by the agent that no sorter understands. Kept so the engine
    /// can report it instead of silently dropping it.
    Unrecognized(String),
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "price_asc" | "price_low_to_high" => Self::PriceAsc,
            "price_desc" | "price_high_to_low" => Self::PriceDesc,
            "rating_desc" | "rating_high_to_low" => Self::RatingDesc,
            "name_asc" | "name_a_to_z" => Self::NameAsc,
            "name_desc" | "name_z_to_a" => Self::NameDesc,
            _ => Self::Unrecognized(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::RatingDesc => "rating_desc",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::PriceAsc => Some("Price: Low to High"),
            Self::PriceDesc => Some("Price: High to Low"),
            Self::RatingDesc => Some("Highest Rated"),
            Self::NameAsc => Some("Name (A → Z)"),
            Self::NameDesc => Some("Name (Z → A)"),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SortOrder> for String {
    fn from(value: SortOrder) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The query currently applied to the catalog. Owned by the session layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub sort_by: Option<SortOrder>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.sort_by.is_none()
    }

    /// True when any field narrows the product set. Sorting alone does not.
    pub fn has_constraints(&self) -> bool {
        self.search_term.is_some()
            || self.category.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn apply_edit(&mut self, edit: ManualFilterEdit) {
        match edit {
            ManualFilterEdit::SearchTerm(value) => self.search_term = non_blank(value),
            ManualFilterEdit::Category(value) => self.category = non_blank(value),
            ManualFilterEdit::MinPrice(value) => self.min_price = value.filter(|price| *price > 0),
            ManualFilterEdit::MaxPrice(value) => self.max_price = value.filter(|price| *price > 0),
            ManualFilterEdit::SortBy(value) => self.sort_by = value,
        }
    }
}

/// Partial update produced by the free-text extractor.
///
/// `None` means "leave this field alone", never "clear it". Only `clear_all`
/// resets fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortOrder>,
    #[serde(default)]
    pub clear_all: bool,
}

impl ExtractedFilters {
    pub fn clear_all() -> Self {
        Self { clear_all: true, ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        !self.clear_all
            && self.search_term.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.sort_by.is_none()
    }
}

/// A user-initiated edit from the manual filter panel. `None` clears the field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ManualFilterEdit {
    SearchTerm(Option<String>),
    Category(Option<String>),
    MinPrice(Option<u64>),
    MaxPrice(Option<u64>),
    SortBy(Option<SortOrder>),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|text| text.trim().to_string()).filter(|text| !text.is_empty())
}
