use serde::{Deserialize, Serialize};

use crate::cocktail::{Category, Cocktail};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFacet {
    #[default]
    All,
    Cocktail,
    Mocktail,
}

impl CategoryFacet {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFacet::All => true,
            CategoryFacet::Cocktail => category == Category::Cocktail,
            CategoryFacet::Mocktail => category == Category::Mocktail,
        }
    }
}

/// Price buckets on whole dollars: budget under 15, mid 15 to 20 inclusive,
/// premium over 20.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    #[default]
    All,
    Budget,
    Mid,
    Premium,
}

impl PriceRange {
    pub fn matches(&self, price: Option<u32>) -> bool {
        match (self, price) {
            (PriceRange::All, _) => true,
            (_, None) => false,
            (PriceRange::Budget, Some(p)) => p < 15,
            (PriceRange::Mid, Some(p)) => (15..=20).contains(&p),
            (PriceRange::Premium, Some(p)) => p > 20,
        }
    }
}

/// Strength buckets on whole percent: light up to 10, medium 11 to 15, strong
/// above 15.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlcoholRange {
    #[default]
    All,
    Light,
    Medium,
    Strong,
}

impl AlcoholRange {
    pub fn matches(&self, abv: Option<u32>) -> bool {
        match (self, abv) {
            (AlcoholRange::All, _) => true,
            (_, None) => false,
            (AlcoholRange::Light, Some(a)) => a <= 10,
            (AlcoholRange::Medium, Some(a)) => (11..=15).contains(&a),
            (AlcoholRange::Strong, Some(a)) => a > 15,
        }
    }
}

/// Search text plus facet selections. Deserializes from the gallery query
/// string; anything omitted means "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    pub search: String,
    pub category: CategoryFacet,
    pub price_range: PriceRange,
    pub alcohol_content: AlcoholRange,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when any facet or the search narrows the result.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category != CategoryFacet::All
            || self.price_range != PriceRange::All
            || self.alcohol_content != AlcoholRange::All
    }

    pub fn matches(&self, cocktail: &Cocktail) -> bool {
        let needle = self.search.trim().to_lowercase();
        self.matches_with_needle(cocktail, &needle)
    }

    fn matches_with_needle(&self, cocktail: &Cocktail, needle: &str) -> bool {
        (needle.is_empty() || cocktail.mentions(needle))
            && self.category.matches(cocktail.category)
            && self.price_range.matches(cocktail.price_value())
            && self.alcohol_content.matches(cocktail.alcohol_value())
    }

    /// Keep the records that match, preserving their relative order.
    pub fn apply<'a, I>(&self, cocktails: I) -> Vec<&'a Cocktail>
    where
        I: IntoIterator<Item = &'a Cocktail>,
    {
        let needle = self.search.trim().to_lowercase();
        cocktails
            .into_iter()
            .filter(|c| self.matches_with_needle(c, &needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cocktail::CocktailId;

    fn make_cocktail(id: u32, name: &str, price: &str, abv: &str) -> Cocktail {
        Cocktail {
            id: CocktailId(id),
            name: name.to_string(),
            title: String::new(),
            description: format!("{} served cold", name),
            category: Category::Cocktail,
            price: price.to_string(),
            alcohol_content: abv.to_string(),
            ingredients: vec!["Ice".to_string()],
            preparation: String::new(),
            image: String::new(),
        }
    }

    fn ids(cocktails: &[&Cocktail]) -> Vec<u32> {
        cocktails.iter().map(|c| c.id.0).collect()
    }

    fn price_catalog() -> Vec<Cocktail> {
        vec![
            make_cocktail(1, "Cheap", "$12", "8%"),
            make_cocktail(2, "Middle", "$18", "12%"),
            make_cocktail(3, "Fancy", "$25", "30%"),
        ]
    }

    #[test]
    fn test_default_filter_is_identity() {
        let catalog = price_catalog();
        let filter = CatalogFilter::new();
        assert!(!filter.is_active());
        assert_eq!(ids(&filter.apply(&catalog)), vec![1, 2, 3]);
    }

    #[test]
    fn test_price_buckets() {
        let catalog = price_catalog();
        let mut filter = CatalogFilter::new();

        filter.price_range = PriceRange::Budget;
        assert_eq!(ids(&filter.apply(&catalog)), vec![1]);

        filter.price_range = PriceRange::Mid;
        assert_eq!(ids(&filter.apply(&catalog)), vec![2]);

        filter.price_range = PriceRange::Premium;
        assert_eq!(ids(&filter.apply(&catalog)), vec![3]);
    }

    #[test]
    fn test_price_bucket_boundaries() {
        assert!(PriceRange::Budget.matches(Some(14)));
        assert!(!PriceRange::Budget.matches(Some(15)));
        assert!(PriceRange::Mid.matches(Some(15)));
        assert!(PriceRange::Mid.matches(Some(20)));
        assert!(!PriceRange::Premium.matches(Some(20)));
        assert!(PriceRange::Premium.matches(Some(21)));
    }

    #[test]
    fn test_alcohol_buckets() {
        assert!(AlcoholRange::Light.matches(Some(0)));
        assert!(AlcoholRange::Light.matches(Some(10)));
        assert!(AlcoholRange::Medium.matches(Some(11)));
        assert!(AlcoholRange::Medium.matches(Some(15)));
        assert!(AlcoholRange::Strong.matches(Some(16)));
        assert!(!AlcoholRange::Strong.matches(Some(15)));
    }

    #[test]
    fn test_fractional_values_bucket_on_whole_part() {
        let catalog = vec![make_cocktail(1, "Odd", "$20.50", "10.5%")];

        let filter = CatalogFilter {
            price_range: PriceRange::Mid,
            alcohol_content: AlcoholRange::Light,
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![1]);

        let filter = CatalogFilter {
            price_range: PriceRange::Premium,
            ..Default::default()
        };
        assert!(filter.apply(&catalog).is_empty());
    }

    #[test]
    fn test_unparseable_numbers_only_pass_all() {
        let catalog = vec![make_cocktail(1, "Mystery", "market price", "varies")];
        let mut filter = CatalogFilter::new();
        assert_eq!(filter.apply(&catalog).len(), 1);

        filter.price_range = PriceRange::Budget;
        assert!(filter.apply(&catalog).is_empty());

        filter.price_range = PriceRange::All;
        filter.alcohol_content = AlcoholRange::Light;
        assert!(filter.apply(&catalog).is_empty());
    }

    #[test]
    fn test_search_matches_ingredients() {
        let mut catalog = price_catalog();
        catalog[1].ingredients.push("Fresh MINT leaves".to_string());

        let filter = CatalogFilter {
            search: "mint".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![2]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let catalog = price_catalog();
        let filter = CatalogFilter {
            search: "FANCY".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![3]);

        let filter = CatalogFilter {
            search: "served cold".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![1, 2, 3]);
    }

    #[test]
    fn test_facets_combine_with_and() {
        let mut catalog = price_catalog();
        catalog[0].category = Category::Mocktail;

        let filter = CatalogFilter {
            category: CategoryFacet::Cocktail,
            price_range: PriceRange::Mid,
            alcohol_content: AlcoholRange::Medium,
            ..Default::default()
        };
        assert!(filter.is_active());
        assert_eq!(ids(&filter.apply(&catalog)), vec![2]);

        let filter = CatalogFilter {
            category: CategoryFacet::Mocktail,
            price_range: PriceRange::Mid,
            ..Default::default()
        };
        assert!(filter.apply(&catalog).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = price_catalog();
        let filter = CatalogFilter {
            search: "e".to_string(),
            alcohol_content: AlcoholRange::Medium,
            ..Default::default()
        };

        let once = filter.apply(&catalog);
        let twice = filter.apply(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_whitespace_search_matches_everything() {
        let catalog = price_catalog();
        let filter = CatalogFilter {
            search: "   ".to_string(),
            ..Default::default()
        };
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&catalog).len(), 3);
    }

    #[test]
    fn test_deserialize_from_partial_json() {
        let filter: CatalogFilter =
            serde_json::from_str(r#"{"price_range":"premium"}"#).unwrap();
        assert_eq!(filter.price_range, PriceRange::Premium);
        assert_eq!(filter.category, CategoryFacet::All);
        assert_eq!(filter.search, "");
    }
}
