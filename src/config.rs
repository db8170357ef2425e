//! Configuration for a cache node.
//!
//! # Example
//!
//! ```
//! use peercache::NodeConfig;
//!
//! // Minimal config (uses defaults)
//! let config = NodeConfig::default();
//! assert_eq!(config.base_path, "/_geecache/");
//! assert_eq!(config.replicas, 50);
//!
//! // Three-node cluster, this node first
//! let config = NodeConfig {
//!     addr: "http://127.0.0.1:8001".into(),
//!     peers: vec![
//!         "http://127.0.0.1:8001".into(),
//!         "http://127.0.0.1:8002".into(),
//!         "http://127.0.0.1:8003".into(),
//!     ],
//!     admission_k: 2,
//!     ..Default::default()
//! };
//! assert_eq!(config.peers.len(), 3);
//! ```

use serde::Deserialize;
use std::time::Duration;

use crate::cache::CacheShard;
use crate::peers::PoolOptions;
use crate::peers::protocol::DEFAULT_BASE_PATH;
use crate::peers::ring::DEFAULT_REPLICAS;

/// Configuration for one node.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// This node's own address as it appears in the peer list (e.g. "http://127.0.0.1:8001")
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Full peer list, including this node
    #[serde(default)]
    pub peers: Vec<String>,

    /// Prefix of every peer request
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Virtual nodes per peer on the hash ring
    #[serde(default = "default_replicas")]
    pub replicas: usize,

    /// Deadline for one remote fetch
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Main queue budget per group in bytes (0 = unbounded)
    #[serde(default = "default_cache_bytes")]
    pub cache_bytes: usize,

    /// History queue budget per group in bytes (0 = same as `cache_bytes`)
    #[serde(default)]
    pub history_bytes: usize,

    /// Observations needed before a key is admitted to the main queue
    #[serde(default = "default_admission_k")]
    pub admission_k: usize,
}

fn default_addr() -> String { "http://127.0.0.1:8001".to_string() }
fn default_base_path() -> String { DEFAULT_BASE_PATH.to_string() }
fn default_replicas() -> usize { DEFAULT_REPLICAS }
fn default_fetch_timeout_ms() -> u64 { 3_000 }
fn default_cache_bytes() -> usize { 64 * 1024 * 1024 } // 64 MB
fn default_admission_k() -> usize { 1 }

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            peers: Vec::new(),
            base_path: default_base_path(),
            replicas: default_replicas(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            cache_bytes: default_cache_bytes(),
            history_bytes: 0,
            admission_k: default_admission_k(),
        }
    }
}

impl NodeConfig {
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            base_path: self.base_path.clone(),
            replicas: self.replicas,
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            hash: None,
        }
    }

    /// A fresh shard sized by this config.
    pub fn cache_shard(&self) -> CacheShard {
        let history_bytes = if self.history_bytes == 0 {
            self.cache_bytes
        } else {
            self.history_bytes
        };
        CacheShard::with_admission(self.cache_bytes, history_bytes, self.admission_k)
    }

    /// Peer list with this node added if it was missing.
    pub fn peer_set(&self) -> Vec<String> {
        let mut peers = self.peers.clone();
        if !peers.iter().any(|peer| peer == &self.addr) {
            peers.push(self.addr.clone());
        }
        peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: NodeConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.base_path, "/_geecache/");
        assert_eq!(config.replicas, 50);
        assert_eq!(config.fetch_timeout_ms, 3_000);
        assert_eq!(config.admission_k, 1);
        assert!(config.peers.is_empty());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config: NodeConfig = serde_json::from_str(
            r#"{"addr": "http://10.0.0.1:9000", "admission_k": 2, "cache_bytes": 1024}"#,
        )
        .unwrap();

        assert_eq!(config.addr, "http://10.0.0.1:9000");
        assert_eq!(config.admission_k, 2);
        assert_eq!(config.cache_bytes, 1024);
        assert_eq!(config.pool_options().fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_peer_set_includes_self() {
        let config = NodeConfig {
            addr: "http://a:1".into(),
            peers: vec!["http://b:1".into()],
            ..Default::default()
        };

        assert_eq!(config.peer_set(), vec!["http://b:1", "http://a:1"]);
    }

    #[test]
    fn test_history_budget_defaults_to_cache_budget() {
        let config = NodeConfig {
            cache_bytes: 10,
            ..Default::default()
        };
        let shard = config.cache_shard();

        shard.add("key1", "123456".into());
        shard.add("k2", "k2".into());

        // Same budgets as a plain 10-byte LRU: key1 is pushed out
        assert_eq!(shard.get("key1"), None);
        assert!(shard.get("k2").is_some());
    }
}
