use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::byteview::ByteView;
use super::eviction::EvictionCache;

/// Point-in-time counters for one shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShardStats {
    pub entries: usize,
    pub bytes: usize,
    pub history_entries: usize,
    pub history_bytes: usize,
    pub evictions: u64,
}

/// A thread-safe cache shard.
///
/// Every call goes through a single mutex. The underlying [`EvictionCache`]
/// is built on the first `add`, so an idle shard costs nothing beyond its
/// configuration.
#[derive(Debug)]
pub struct CacheShard {
    inner: Mutex<Option<EvictionCache<ByteView>>>,
    cache_bytes: usize,
    history_bytes: usize,
    admission_k: usize,
    evictions: Arc<AtomicU64>,
}

impl CacheShard {
    /// A plain LRU shard: history shares the main budget and `k = 1`.
    pub fn new(cache_bytes: usize) -> Self {
        Self::with_admission(cache_bytes, cache_bytes, 1)
    }

    pub fn with_admission(cache_bytes: usize, history_bytes: usize, admission_k: usize) -> Self {
        Self {
            inner: Mutex::new(None),
            cache_bytes,
            history_bytes,
            admission_k,
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.inner.lock();
        let cache = guard.get_or_insert_with(|| {
            let evictions = self.evictions.clone();
            EvictionCache::new(self.cache_bytes, self.history_bytes, self.admission_k)
                .with_on_evicted(move |_key, _value| {
                    evictions.fetch_add(1, Ordering::Relaxed);
                })
        });
        cache.add(key, value);
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.inner.lock();
        guard.as_mut()?.get(key)
    }

    /// Whether the underlying cache has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_some()
    }

    pub fn stats(&self) -> ShardStats {
        let guard = self.inner.lock();
        let evictions = self.evictions.load(Ordering::Relaxed);
        match guard.as_ref() {
            Some(cache) => ShardStats {
                entries: cache.len(),
                bytes: cache.bytes(),
                history_entries: cache.history_len(),
                history_bytes: cache.history_bytes(),
                evictions,
            },
            None => ShardStats {
                evictions,
                ..ShardStats::default()
            },
        }
    }
}
