//! Cache-aside lookups with request coalescing.
//!
//! `resolve` answers from the cache when it can. On a miss the first caller
//! registers an in-flight lookup for the key; callers arriving while it runs
//! await the same shared future instead of starting their own. The lookup runs
//! on its own task, so it finishes and fills the cache even if every caller
//! goes away. Only successful results are written back. The in-flight marker
//! is dropped after the cache write, so a later caller sees either the marker
//! or the cached value.

use crate::{
    cache::KVCache,
    error::{Error, Result},
};
use dashmap::{DashMap, mapref::entry::Entry};
use futures_util::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use std::sync::Arc;
use tracing::{debug, warn};

type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;
type InflightMap<V, E> = Arc<DashMap<String, Flight<V, E>>>;

pub struct CachedResolver<C, V, E> {
    cache:    C,
    inflight: InflightMap<V, E>,
}

impl<C: Clone, V, E> Clone for CachedResolver<C, V, E> {
    fn clone(&self) -> Self {
        Self {
            cache:    self.cache.clone(),
            inflight: self.inflight.clone(),
        }
    }
}

// Clears the in-flight marker even if the lookup panics.
struct InflightGuard<V, E> {
    inflight: InflightMap<V, E>,
    key:      String,
}

impl<V, E> Drop for InflightGuard<V, E> {
    fn drop(&mut self) {
        self.inflight.remove(&self.key);
    }
}

impl<C, V, E> CachedResolver<C, V, E>
where
    C: KVCache<V>,
    V: Clone + Send + Sync + 'static,
    E: std::fmt::Display + Send + Sync + 'static,
{
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            inflight: Arc::new(DashMap::new()),
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Number of lookups currently running.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    pub async fn resolve<F, Fut>(&self, key: String, lookup: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
    {
        if let Some(value) = self.cache.get(&key).await {
            debug!(%key, "cache hit");
            return Ok(value);
        }

        let flight = match self.inflight.entry(key) {
            Entry::Occupied(e) => {
                debug!(key = %e.key(), "joining in-flight lookup");
                e.get().clone()
            }
            Entry::Vacant(e) => {
                debug!(key = %e.key(), "cache miss");
                let flight = self.spawn_flight(e.key().clone(), lookup);
                e.insert(flight.clone());
                flight
            }
        };
        flight.await
    }

    fn spawn_flight<F, Fut>(&self, key: String, lookup: F) -> Flight<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
    {
        let cache = self.cache.clone();
        let guard = InflightGuard {
            inflight: self.inflight.clone(),
            key,
        };

        let handle = tokio::spawn(async move {
            let key = guard.key.as_str();
            // A flight that finished between our cache check and registering
            // this one has already filled the cache.
            if let Some(value) = cache.get(key).await {
                return Ok(value);
            }
            match lookup().await {
                Ok(value) => {
                    cache.set(key, value.clone()).await;
                    Ok(value)
                }
                Err(e) => {
                    warn!(key, error = %e, "lookup failed");
                    Err(Error::Lookup(Arc::new(e)))
                }
            }
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(Error::LookupAborted(e.to_string())))
        }
        .boxed()
        .shared()
    }
}
