//! Group Registry
//!
//! An explicit, shareable map from group names to [`Group`]s. One registry is
//! built at startup and handed to everything that needs to resolve a group by
//! name (the peer server, the frontend API), so several independent nodes can
//! live in the same process.

use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::group::{GetterFn, Group};
use crate::cache::CacheShard;

pub struct GroupRegistry {
    groups: DashMap<String, Arc<Group>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a group backed by a plain LRU shard of `cache_bytes`.
    ///
    /// # Arguments
    /// * `name` - Group name used in peer requests.
    /// * `cache_bytes` - Byte budget of the local shard (`0` = unbounded).
    /// * `getter` - Loads a value from the source of truth on a miss.
    pub fn new_group<F, Fut>(&self, name: &str, cache_bytes: usize, getter: F) -> Arc<Group>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        self.new_group_with_cache(name, CacheShard::new(cache_bytes), getter)
    }

    /// Registers a group with a caller-configured shard, e.g. one with an
    /// admission threshold above 1. A group with the same name is replaced.
    pub fn new_group_with_cache<F, Fut>(&self, name: &str, cache: CacheShard, getter: F) -> Arc<Group>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        // Type-erase the concrete future so every group stores the same getter type.
        let getter_fn: GetterFn = Arc::new(move |key: String| {
            Box::pin(getter(key)) as Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>
        });

        let group = Arc::new(Group::new(name.to_string(), cache, getter_fn));
        self.groups.insert(name.to_string(), group.clone());

        tracing::info!("Registered group: {}", name);
        group
    }

    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// Returns the names of all registered groups, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
