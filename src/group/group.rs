use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::cache::{ByteView, CacheShard, ShardStats};
use crate::peers::PeerPicker;

/// Type alias for a thread-safe, asynchronous loader.
/// It takes the key and resolves to the value's bytes from the source of truth.
pub type GetterFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>> + Send + Sync>;

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
}

/// Counters for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub gets: u64,
    pub cache_hits: u64,
    pub peer_loads: u64,
    pub peer_errors: u64,
    pub local_loads: u64,
    pub cache: ShardStats,
}

/// A named cache namespace with its own loader.
///
/// `get` tries the local shard, then the owning peer, then the loader. Values
/// produced by the loader are kept in the local shard; values fetched from a
/// peer are not, since the owner already caches them.
pub struct Group {
    name: String,
    getter: GetterFn,
    main_cache: CacheShard,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    counters: Counters,
}

impl Group {
    pub(crate) fn new(name: String, main_cache: CacheShard, getter: GetterFn) -> Self {
        Self {
            name,
            getter,
            main_cache,
            peers: OnceLock::new(),
            counters: Counters::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the peer picker used to route misses. Can only be done once.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| anyhow::anyhow!("peers already registered for group {}", self.name))
    }

    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            anyhow::bail!("key is required");
        }
        self.counters.gets.fetch_add(1, Ordering::Relaxed);

        if let Some(value) = self.main_cache.get(key) {
            self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("[{}] cache hit for {}", self.name, key);
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(fetcher) = self.peers.get().and_then(|peers| peers.pick_peer(key)) {
            match fetcher.fetch(&self.name, key).await {
                Ok(bytes) => {
                    self.counters.peer_loads.fetch_add(1, Ordering::Relaxed);
                    return Ok(ByteView::from(bytes));
                }
                Err(e) => {
                    self.counters.peer_errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("[{}] Failed to get {} from peer: {}", self.name, key, e);
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = (self.getter)(key.to_string()).await?;
        self.counters.local_loads.fetch_add(1, Ordering::Relaxed);

        let value = ByteView::from(bytes);
        self.main_cache.add(key, value.clone());
        Ok(value)
    }

    pub fn stats(&self) -> GroupStats {
        GroupStats {
            gets: self.counters.gets.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            peer_loads: self.counters.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.counters.peer_errors.load(Ordering::Relaxed),
            local_loads: self.counters.local_loads.load(Ordering::Relaxed),
            cache: self.main_cache.stats(),
        }
    }
}
