//! Peer capability traits.
//!
//! Groups only ever need two things from the peer layer: find out who owns a
//! key, and pull bytes from that owner. Both traits are object safe so a
//! group can hold `Arc<dyn PeerPicker>` regardless of transport.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::FetchError;

/// Boxed future returned by [`PeerFetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, FetchError>> + Send + 'a>>;

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer's fetcher, or `None` when the key should be
    /// served locally (no peers, or this node owns it).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>>;
}

/// Retrieves a value for a `(group, key)` pair from one specific peer.
pub trait PeerFetcher: Send + Sync {
    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> FetchFuture<'a>;
}
