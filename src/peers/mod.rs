//! Peer Coordination Module
//!
//! Routes every key to exactly one owning node and moves values between nodes over HTTP.
//!
//! ## Core Concepts
//! - **Placement**: `HashRing` maps keys onto a fixed peer set through virtual replicas (consistent hashing).
//! - **Picking**: `HttpPool` answers "who owns this key?"; this node's own keys are served locally.
//! - **Fetching**: `HttpFetcher` pulls raw bytes for a `(group, key)` from the owner, with a deadline.
//! - **Serving**: `HttpPool::router` answers the same protocol for this node's groups.
//!
//! ## Submodules
//! - **`ring`**: Consistent hash ring.
//! - **`picker`**: `PeerPicker` / `PeerFetcher` capability traits.
//! - **`client`**: Outbound HTTP fetcher.
//! - **`pool`**: Peer set, picking and the server entry point.
//! - **`handlers`**: Axum handler for inbound peer requests.
//! - **`protocol`**: Paths, URL encoding and request parsing.

pub mod client;
pub mod handlers;
pub mod picker;
pub mod pool;
pub mod protocol;
pub mod ring;

pub use client::HttpFetcher;
pub use picker::{FetchFuture, PeerFetcher, PeerPicker};
pub use pool::{HttpPool, PoolOptions};
pub use ring::HashRing;
