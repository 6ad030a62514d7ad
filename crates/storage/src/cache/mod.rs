pub mod bounded;
pub mod ttl;

use bounded::BoundedCache;
use std::time::Duration;
use ttl::TtlCache;

pub trait KVCache<V>: Clone + Send + Sync + 'static
where
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &str) -> impl Future<Output = Option<V>> + Send;

    fn invalidate(&self, key: &str) -> impl Future<Output = ()> + Send;

    fn set(&self, key: &str, value: V) -> impl Future<Output = ()> + Send;
}

/// Cache flavour picked at startup.
#[derive(Clone)]
pub enum AnyCache<V> {
    Ttl(TtlCache<V>),
    Bounded(BoundedCache<V>),
}

impl<V> AnyCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_capacity: Option<u64>) -> Self {
        match max_capacity {
            Some(capacity) => Self::Bounded(BoundedCache::new(ttl, capacity)),
            None => Self::Ttl(TtlCache::new(ttl)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ttl(_) => "ttl",
            Self::Bounded(_) => "bounded",
        }
    }
}

impl<V> KVCache<V> for AnyCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        match self {
            Self::Ttl(c) => c.get(key).await,
            Self::Bounded(c) => c.get(key).await,
        }
    }

    async fn invalidate(&self, key: &str) {
        match self {
            Self::Ttl(c) => c.invalidate(key).await,
            Self::Bounded(c) => c.invalidate(key).await,
        }
    }

    async fn set(&self, key: &str, value: V) {
        match self {
            Self::Ttl(c) => c.set(key, value).await,
            Self::Bounded(c) => c.set(key, value).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_cache_selection() {
        let unbounded = AnyCache::<u32>::new(Duration::from_secs(60), None);
        assert_eq!(unbounded.kind(), "ttl");
        let bounded = AnyCache::<u32>::new(Duration::from_secs(60), Some(16));
        assert_eq!(bounded.kind(), "bounded");

        for cache in [unbounded, bounded] {
            cache.set("k", 7).await;
            assert_eq!(cache.get("k").await, Some(7));
            cache.invalidate("k").await;
            assert_eq!(cache.get("k").await, None);
        }
    }
}
