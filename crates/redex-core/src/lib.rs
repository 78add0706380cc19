//! Redex Core - Catalog, favorites, and form validation.
//!
//! This crate contains the domain logic for the Redex cocktail bar site.
//! It has no dependencies on other Redex crates.

pub mod catalog;
pub mod cocktail;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod form;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use catalog::Catalog;
pub use cocktail::{Category, Cocktail, CocktailId};
pub use error::{CatalogError, FormError, StorageError, ValidationError};
pub use favorites::{FavoritesChange, FavoritesStore, SubscriptionId, FAVORITES_KEY};
pub use filter::{AlcoholRange, CatalogFilter, CategoryFacet, PriceRange};
pub use form::FormState;
pub use storage::KeyValueStore;
pub use validation::{
    time_slots, FormErrors, Reservation, ReservationRequest, Subscription, SubscriptionRequest,
    Validator,
};

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::InMemoryKeyValueStore;
