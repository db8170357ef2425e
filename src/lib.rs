//! Distributed Read-Through Cache Library
//!
//! This library crate defines the core modules of a cache node. Every node keeps a
//! bounded local cache and, on a miss, asks the peer that owns the key instead of
//! recomputing the value. It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`cache`**: The local store. A byte-budgeted LRU fronted by a FIFO history queue that
//!   only admits keys seen `k` times, wrapped in a lazily built, locked shard.
//! - **`peers`**: The coordination layer. A consistent hash ring picks the owner of each key;
//!   an HTTP client fetches from owners and an HTTP server answers other nodes.
//! - **`group`**: Named caches with loaders, and the explicit registry that resolves them by name.
//! - **`config`**: Node configuration with defaults.
//! - **`error`**: Typed errors for the peer protocol.

pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod peers;

pub use cache::{ByteView, CacheShard, EvictionCache};
pub use config::NodeConfig;
pub use error::{FetchError, ServeError};
pub use group::{Group, GroupRegistry};
pub use peers::{HashRing, HttpFetcher, HttpPool, PeerFetcher, PeerPicker, PoolOptions};
