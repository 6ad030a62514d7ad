//! Unbounded cache whose entries expire a fixed time after their last write.
//!
//! Every entry owns the handle of its pending expiry task. A new `set` on the
//! same key aborts that task before arming a fresh one, so only the latest
//! write's deadline counts. Each write also gets a generation number: an expiry
//! task that already woke up and is queued on the lock when the key is
//! rewritten finds a different generation and leaves the entry alone.
//! Reads additionally compare against the stored deadline, so a lagging timer
//! never makes an expired value observable.

use super::KVCache;
use std::{
    collections::HashMap,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::RwLock,
    task::AbortHandle,
    time::{self, Instant},
};
use tracing::trace;

struct Entry<V> {
    value:      V,
    expires_at: Instant,
    generation: u64,
    timer:      AbortHandle,
}

struct Inner<V> {
    entries:    RwLock<HashMap<String, Entry<V>>>,
    ttl:        Duration,
    generation: AtomicU64,
}

impl<V> Inner<V> {
    async fn expire(&self, key: &str, generation: u64) {
        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.generation == generation)
        {
            entries.remove(key);
            trace!(key, generation, "cache entry expired");
        }
    }
}

pub struct TtlCache<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(HashMap::new()),
                ttl,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Number of stored entries, including ones whose timer has not run yet.
    pub async fn len(&self) -> usize {
        self.inner.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // Needs a running tokio runtime.
    fn arm(&self, key: String, generation: u64) -> AbortHandle {
        let inner: Weak<Inner<V>> = Arc::downgrade(&self.inner);
        let ttl = self.inner.ttl;
        tokio::spawn(async move {
            time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                inner.expire(&key, generation).await;
            }
        })
        .abort_handle()
    }
}

impl<V> KVCache<V> for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        let entries = self.inner.entries.read().await;
        let now = Instant::now();
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    async fn invalidate(&self, key: &str) {
        let mut entries = self.inner.entries.write().await;
        if let Some(entry) = entries.remove(key) {
            entry.timer.abort();
        }
    }

    async fn set(&self, key: &str, value: V) {
        let mut entries = self.inner.entries.write().await;
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.inner.ttl,
            generation,
            timer: self.arm(key.to_owned(), generation),
        };
        if let Some(previous) = entries.insert(key.to_owned(), entry) {
            previous.timer.abort();
        }
    }
}
