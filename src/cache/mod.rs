//! Local Cache Module
//!
//! The in-process, byte-budgeted store each node keeps for the keys it serves.
//!
//! ## Core Concepts
//! - **Admission**: New keys wait in a FIFO history queue until they have been seen `k` times.
//! - **Eviction**: The main queue is an LRU; both queues evict when they exceed their byte budget.
//! - **Sharding**: `CacheShard` wraps the single-threaded `EvictionCache` in one lock and builds it lazily.
//!
//! ## Submodules
//! - **`byteview`**: The immutable value type stored in the cache.
//! - **`eviction`**: The two-queue admission/eviction algorithm.
//! - **`shard`**: Locked, lazily constructed wrapper used by groups.

pub mod byteview;
pub mod eviction;
mod list;
pub mod shard;

pub use byteview::ByteView;
pub use eviction::{EvictionCache, Value};
pub use shard::{CacheShard, ShardStats};
