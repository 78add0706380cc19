use std::collections::HashSet;

use crate::cocktail::{Cocktail, CocktailId};
use crate::error::CatalogError;
use crate::filter::CatalogFilter;

const BUNDLED_CATALOG: &str = include_str!("../data/cocktails.json");

/// The fixed menu. Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    cocktails: Vec<Cocktail>,
}

impl Catalog {
    /// Build a catalog from records, rejecting duplicate ids.
    pub fn new(cocktails: Vec<Cocktail>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(cocktails.len());
        for cocktail in &cocktails {
            if !seen.insert(cocktail.id) {
                return Err(CatalogError::DuplicateId(cocktail.id));
            }
        }
        Ok(Self { cocktails })
    }

    /// Parse a JSON array of cocktail records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cocktails: Vec<Cocktail> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(cocktails)
    }

    /// The menu compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn get(&self, id: CocktailId) -> Option<&Cocktail> {
        self.cocktails.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CocktailId) -> bool {
        self.get(id).is_some()
    }

    /// All records in menu order.
    pub fn all(&self) -> &[Cocktail] {
        &self.cocktails
    }

    pub fn len(&self) -> usize {
        self.cocktails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cocktails.is_empty()
    }

    /// Visible subset for a filter, in menu order.
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Cocktail> {
        filter.apply(&self.cocktails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.get(CocktailId(1)).is_some());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let catalog = Catalog::bundled().unwrap();
        let mut records = catalog.all().to_vec();
        let mut dup = records[0].clone();
        dup.name = "Impostor".to_string();
        records.push(dup);

        assert_eq!(
            Catalog::new(records).unwrap_err(),
            CatalogError::DuplicateId(CocktailId(1))
        );
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_get_unknown_id() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog.get(CocktailId(9999)).is_none());
        assert!(!catalog.contains(CocktailId(9999)));
    }
}
