use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use redex_core::{Catalog, FavoritesStore, KeyValueStore, Reservation, Subscription};
use redex_db::favorites_key;

use crate::config::Config;
use crate::middleware::RateLimiter;
use crate::submissions::Submissions;
use crate::visitor::Visitor;

pub type SharedStorage = Arc<dyn KeyValueStore>;

/// A visitor's loaded favorites and when a request last touched them.
pub struct CachedFavorites {
    store: FavoritesStore<SharedStorage>,
    last_used: Instant,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub storage: SharedStorage,
    /// Favorites of visitors that changed them recently. Every change is
    /// already persisted, so entries can be dropped at any time.
    pub favorites: Arc<DashMap<String, CachedFavorites>>,
    pub reservations: Arc<Submissions<Reservation>>,
    pub newsletter: Arc<Submissions<Subscription>>,
    pub write_limiter: Arc<RateLimiter>,
    pub read_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: &Config, catalog: Catalog, storage: SharedStorage) -> Self {
        Self {
            catalog: Arc::new(catalog),
            storage,
            favorites: Arc::new(DashMap::new()),
            reservations: Arc::new(Submissions::new("reservation", config.reservation_delay)),
            newsletter: Arc::new(Submissions::new("newsletter", config.newsletter_delay)),
            write_limiter: Arc::new(RateLimiter::per_second(config.write_limit)),
            read_limiter: Arc::new(RateLimiter::per_second(config.read_limit)),
        }
    }

    fn load_favorites(&self, visitor: &Visitor) -> FavoritesStore<SharedStorage> {
        FavoritesStore::load_with_key(self.storage.clone(), favorites_key(visitor.as_str()))
    }

    /// Run `f` with exclusive access to the visitor's favorites, loading and
    /// caching them on first use.
    pub fn with_favorites<R>(
        &self,
        visitor: &Visitor,
        f: impl FnOnce(&mut FavoritesStore<SharedStorage>) -> R,
    ) -> R {
        let mut entry = self
            .favorites
            .entry(visitor.as_str().to_string())
            .or_insert_with(|| {
                let mut store = self.load_favorites(visitor);
                let name = visitor.as_str().to_string();
                store.subscribe(move |change| {
                    tracing::debug!("Favorites of {} changed: {:?}", name, change);
                });
                tracing::debug!("Loaded {} favorites for {}", store.count(), visitor.as_str());
                CachedFavorites {
                    store,
                    last_used: Instant::now(),
                }
            });
        entry.last_used = Instant::now();
        f(&mut entry.store)
    }

    /// Read the visitor's favorites. Uncached visitors are read straight from
    /// storage and not cached.
    pub fn read_favorites<R>(
        &self,
        visitor: &Visitor,
        f: impl FnOnce(&FavoritesStore<SharedStorage>) -> R,
    ) -> R {
        if let Some(entry) = self.favorites.get(visitor.as_str()) {
            return f(&entry.store);
        }
        f(&self.load_favorites(visitor))
    }

    /// Drop cached favorites not touched for `max_idle`.
    pub fn evict_idle_favorites(&self, max_idle: Duration) {
        let now = Instant::now();
        self.favorites
            .retain(|_, cached| now.duration_since(cached.last_used) < max_idle);
    }
}
