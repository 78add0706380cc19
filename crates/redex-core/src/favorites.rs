//! Favorites store: the set of cocktail ids a visitor has marked, kept
//! durable in a [`KeyValueStore`] as a JSON array of ids.
//!
//! Persistence never fails loudly. A missing or corrupted value loads as an
//! empty set and a failed write leaves the in-memory set authoritative; both
//! are logged.

use std::fmt;

use crate::catalog::Catalog;
use crate::cocktail::{Cocktail, CocktailId};
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key used when none is given.
pub const FAVORITES_KEY: &str = "cocktail-favorites";

/// A membership change, delivered to subscribers after it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesChange {
    Added(CocktailId),
    Removed(CocktailId),
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&FavoritesChange) + Send + Sync>;

pub struct FavoritesStore<S> {
    storage: S,
    key: String,
    ids: Vec<CocktailId>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    last_persist_error: Option<String>,
}

impl<S> fmt::Debug for FavoritesStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .field("ids", &self.ids)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Load favorites stored under [`FAVORITES_KEY`].
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, FAVORITES_KEY)
    }

    /// Load favorites stored under `key`, falling back to an empty set.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let ids = match storage.get(&key) {
            Ok(Some(bytes)) => match decode_ids(&bytes) {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!("Discarding unreadable favorites under {}: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load favorites under {}: {}", key, e);
                Vec::new()
            }
        };

        Self {
            storage,
            key,
            ids,
            observers: Vec::new(),
            next_subscription: 0,
            last_persist_error: None,
        }
    }

    pub fn is_favorite(&self, id: CocktailId) -> bool {
        self.ids.contains(&id)
    }

    /// Insert `id`. Returns true if it was not already a favorite.
    pub fn add(&mut self, id: CocktailId) -> bool {
        let added = !self.is_favorite(id);
        if added {
            self.ids.push(id);
        }
        self.persist();
        if added {
            self.notify(FavoritesChange::Added(id));
        }
        added
    }

    /// Delete `id`. Returns true if it was a favorite.
    pub fn remove(&mut self, id: CocktailId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        let removed = self.ids.len() != before;
        self.persist();
        if removed {
            self.notify(FavoritesChange::Removed(id));
        }
        removed
    }

    /// Flip membership of `id`. Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, id: CocktailId) -> bool {
        if self.is_favorite(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    pub fn clear(&mut self) {
        let had_any = !self.ids.is_empty();
        self.ids.clear();
        self.persist();
        if had_any {
            self.notify(FavoritesChange::Cleared);
        }
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Favorite ids in the order they were added.
    pub fn ids(&self) -> &[CocktailId] {
        &self.ids
    }

    /// Resolve favorites against the catalog, in menu order. Ids the catalog
    /// does not know are skipped.
    pub fn favorite_cocktails<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Cocktail> {
        catalog
            .all()
            .iter()
            .filter(|c| self.is_favorite(c.id))
            .collect()
    }

    /// Message of the most recent failed write, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Register a callback invoked after every membership change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&FavoritesChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn persist(&mut self) {
        let result = serde_json::to_vec(&self.ids)
            .map_err(|e| StorageError::Serialization(e.to_string()))
            .and_then(|bytes| self.storage.set(&self.key, &bytes));

        match result {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::error!("Failed to save favorites under {}: {}", self.key, e);
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    fn notify(&self, change: FavoritesChange) {
        for (_, observer) in &self.observers {
            observer(&change);
        }
    }
}

/// Decode a stored id array, dropping repeats but keeping first-seen order.
fn decode_ids(bytes: &[u8]) -> Result<Vec<CocktailId>, serde_json::Error> {
    let raw: Vec<CocktailId> = serde_json::from_slice(bytes)?;
    let mut ids = Vec::with_capacity(raw.len());
    for id in raw {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryKeyValueStore;
    use std::sync::{Arc, Mutex};

    fn new_store() -> (Arc<InMemoryKeyValueStore>, FavoritesStore<Arc<InMemoryKeyValueStore>>) {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let favorites = FavoritesStore::load(storage.clone());
        (storage, favorites)
    }

    #[test]
    fn test_starts_empty() {
        let (_, favorites) = new_store();
        assert_eq!(favorites.count(), 0);
        assert!(!favorites.is_favorite(CocktailId(1)));
    }

    #[test]
    fn test_add_and_remove() {
        let (_, mut favorites) = new_store();

        assert!(favorites.add(CocktailId(3)));
        assert!(favorites.is_favorite(CocktailId(3)));

        // Adding again is a no-op
        assert!(!favorites.add(CocktailId(3)));
        assert_eq!(favorites.count(), 1);

        assert!(favorites.remove(CocktailId(3)));
        assert!(!favorites.is_favorite(CocktailId(3)));

        // Removing an absent id is a no-op
        assert!(!favorites.remove(CocktailId(3)));
        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let (_, mut favorites) = new_store();
        favorites.add(CocktailId(1));

        for id in [CocktailId(1), CocktailId(2)] {
            let before = favorites.is_favorite(id);
            assert_eq!(favorites.toggle(id), !before);
            assert_eq!(favorites.toggle(id), before);
            assert_eq!(favorites.is_favorite(id), before);
        }
    }

    #[test]
    fn test_reload_reproduces_state() {
        let (storage, mut favorites) = new_store();

        favorites.add(CocktailId(5));
        favorites.add(CocktailId(2));
        favorites.toggle(CocktailId(9));
        favorites.remove(CocktailId(5));
        favorites.toggle(CocktailId(7));

        let reloaded = FavoritesStore::load(storage.clone());
        assert_eq!(reloaded.ids(), favorites.ids());
        assert_eq!(reloaded.ids(), &[CocktailId(2), CocktailId(9), CocktailId(7)]);

        favorites.clear();
        let reloaded = FavoritesStore::load(storage);
        assert_eq!(reloaded.count(), 0);
    }

    #[test]
    fn test_persists_json_array() {
        let (storage, mut favorites) = new_store();
        favorites.add(CocktailId(4));
        favorites.add(CocktailId(1));

        let raw = storage.get(FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(raw, b"[4,1]");
    }

    #[test]
    fn test_corrupted_value_loads_empty() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        storage.put_raw(FAVORITES_KEY, b"definitely not json");

        let favorites = FavoritesStore::load(storage.clone());
        assert_eq!(favorites.count(), 0);

        storage.put_raw(FAVORITES_KEY, br#"{"ids":[1]}"#);
        let favorites = FavoritesStore::load(storage);
        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn test_duplicate_stored_ids_collapse() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        storage.put_raw(FAVORITES_KEY, b"[3,1,3,1]");

        let favorites = FavoritesStore::load(storage);
        assert_eq!(favorites.ids(), &[CocktailId(3), CocktailId(1)]);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (storage, mut favorites) = new_store();
        favorites.add(CocktailId(1));

        storage.set_fail_writes(true);
        favorites.add(CocktailId(2));
        assert!(favorites.is_favorite(CocktailId(2)));
        assert_eq!(favorites.count(), 2);
        assert!(favorites.last_persist_error().is_some());

        // Durable copy still holds the last successful write
        let reloaded = FavoritesStore::load(storage.clone());
        assert_eq!(reloaded.ids(), &[CocktailId(1)]);

        storage.set_fail_writes(false);
        favorites.toggle(CocktailId(3));
        assert!(favorites.last_persist_error().is_none());
        let reloaded = FavoritesStore::load(storage);
        assert_eq!(reloaded.ids(), favorites.ids());
    }

    #[test]
    fn test_separate_keys_are_independent() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut alice = FavoritesStore::load_with_key(storage.clone(), "favorites:alice");
        let bob = FavoritesStore::load_with_key(storage.clone(), "favorites:bob");

        alice.add(CocktailId(1));
        assert!(!bob.is_favorite(CocktailId(1)));

        let bob = FavoritesStore::load_with_key(storage, "favorites:bob");
        assert_eq!(bob.count(), 0);
    }

    #[test]
    fn test_observers_see_changes_only() {
        let (_, mut favorites) = new_store();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let sub = favorites.subscribe(move |change| sink.lock().unwrap().push(*change));

        favorites.add(CocktailId(1));
        favorites.add(CocktailId(1));
        favorites.toggle(CocktailId(1));
        favorites.remove(CocktailId(1));
        favorites.add(CocktailId(2));
        favorites.clear();
        favorites.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                FavoritesChange::Added(CocktailId(1)),
                FavoritesChange::Removed(CocktailId(1)),
                FavoritesChange::Added(CocktailId(2)),
                FavoritesChange::Cleared,
            ]
        );

        assert!(favorites.unsubscribe(sub));
        assert!(!favorites.unsubscribe(sub));
        favorites.add(CocktailId(3));
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_favorite_cocktails_in_menu_order() {
        let catalog = Catalog::bundled().unwrap();
        let (_, mut favorites) = new_store();
        favorites.add(CocktailId(3));
        favorites.add(CocktailId(1));
        favorites.add(CocktailId(4242));

        let resolved: Vec<u32> = favorites
            .favorite_cocktails(&catalog)
            .iter()
            .map(|c| c.id.0)
            .collect();
        assert_eq!(resolved, vec![1, 3]);
    }
}
