use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a cocktail within the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CocktailId(pub u32);

impl fmt::Display for CocktailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cocktail,
    Mocktail,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cocktail => "cocktail",
            Category::Mocktail => "mocktail",
        }
    }
}

/// A drink on the menu. Records are read-only once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cocktail {
    pub id: CocktailId,
    pub name: String,
    /// Short subtitle shown under the name.
    pub title: String,
    pub description: String,
    pub category: Category,
    /// Currency-formatted price, e.g. "$12".
    pub price: String,
    /// Percentage string, e.g. "14%".
    pub alcohol_content: String,
    pub ingredients: Vec<String>,
    pub preparation: String,
    pub image: String,
}

impl Cocktail {
    /// Whole dollars of the price string, if it has a number.
    pub fn price_value(&self) -> Option<u32> {
        parse_leading_integer(&self.price)
    }

    /// Whole percent of the alcohol content, if it has a number.
    pub fn alcohol_value(&self) -> Option<u32> {
        parse_leading_integer(&self.alcohol_content)
    }

    /// Case-insensitive substring match over name, description and ingredients.
    /// `needle` must already be lowercase.
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(needle))
    }
}

/// Whole-number part of a formatted amount such as "$12", "14%" or
/// "€9.50". Leading symbols and whitespace are skipped and anything after the
/// digits, including a fraction, is ignored. Returns `None` when no digit
/// comes first.
pub fn parse_leading_integer(s: &str) -> Option<u32> {
    let s = s.trim_start_matches(|c: char| !c.is_alphanumeric() && c != '.');
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().ok()
}
