use crate::cache::KVCache;
use moka::future::Cache;
use std::{sync::Arc, time::Duration};

/// Size-capped variant backed by moka. An insert restarts the entry's
/// time-to-live, and the least useful entries are evicted past capacity.
pub struct BoundedCache<V>(Arc<Cache<String, V>>);

impl<V> Clone for BoundedCache<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V> BoundedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self(Arc::new(
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        ))
    }

    pub async fn entry_count(&self) -> u64 {
        self.0.run_pending_tasks().await;
        self.0.entry_count()
    }
}

impl<V> KVCache<V> for BoundedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, k: &str) -> Option<V> {
        self.0.get(k).await
    }

    async fn invalidate(&self, k: &str) {
        self.0.invalidate(k).await;
    }

    async fn set(&self, key: &str, value: V) {
        self.0.insert(key.to_owned(), value).await;
    }
}
