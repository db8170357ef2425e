use axum::Router;
use axum::extract::Extension;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::client::{DEFAULT_FETCH_TIMEOUT, HttpFetcher};
use super::handlers::handle_peer_request;
use super::picker::{PeerFetcher, PeerPicker};
use super::protocol::{DEFAULT_BASE_PATH, normalize_base_path, parse_peer_path, peer_base_url};
use super::ring::{DEFAULT_REPLICAS, HashFn, HashRing};
use crate::cache::ByteView;
use crate::error::ServeError;
use crate::group::GroupRegistry;

/// Tunables for an [`HttpPool`].
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub base_path: String,
    pub replicas: usize,
    pub fetch_timeout: Duration,
    /// Ring hash; `None` selects CRC-32.
    pub hash: Option<HashFn>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            hash: None,
        }
    }
}

struct PeerSet {
    ring: HashRing,
    fetchers: HashMap<String, Arc<HttpFetcher>>,
}

/// The pool of HTTP peers this node talks to, and the server side of the
/// peer protocol for this node's own groups.
///
/// The lock guards only the ring and fetcher map. It is held while picking a
/// peer or replacing the peer set, never across a network call.
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    options: PoolOptions,
    client: reqwest::Client,
    peers: RwLock<PeerSet>,
}

impl HttpPool {
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self::with_options(self_addr, PoolOptions::default())
    }

    pub fn with_options(self_addr: impl Into<String>, options: PoolOptions) -> Self {
        let base_path = normalize_base_path(&options.base_path);
        Self {
            self_addr: self_addr.into(),
            base_path,
            peers: RwLock::new(PeerSet {
                ring: HashRing::new(options.replicas, options.hash),
                fetchers: HashMap::new(),
            }),
            options,
            client: reqwest::Client::new(),
        }
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the whole peer set. The list should include this node.
    pub fn set<S: AsRef<str>>(&self, peers: &[S]) {
        let mut ring = HashRing::new(self.options.replicas, self.options.hash);
        ring.add(peers);

        let fetchers = peers
            .iter()
            .map(|peer| {
                let peer = peer.as_ref();
                let fetcher = HttpFetcher::with_client(
                    peer_base_url(peer, &self.base_path),
                    self.client.clone(),
                    self.options.fetch_timeout,
                );
                (peer.to_string(), Arc::new(fetcher))
            })
            .collect();

        *self.peers.write() = PeerSet { ring, fetchers };
        tracing::info!("[Server {}] Peer set updated: {} peers", self.self_addr, peers.len());
    }

    /// Addresses currently in the peer set, sorted.
    pub fn peers(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.peers.read().fetchers.keys().cloned().collect();
        peers.sort();
        peers
    }

    /// The address owning `key`, including this node's own address.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.peers.read().ring.get(key).map(str::to_string)
    }

    /// Answers one inbound peer request path.
    pub async fn serve(&self, path: &str, groups: &GroupRegistry) -> Result<ByteView, ServeError> {
        let (group_name, key) = parse_peer_path(&self.base_path, path)?;

        let group = groups
            .get_group(&group_name)
            .ok_or_else(|| ServeError::NoSuchGroup(group_name.clone()))?;

        group
            .get(&key)
            .await
            .map_err(|e| ServeError::Lookup(e.to_string()))
    }

    /// An axum router answering the peer protocol. Every path is routed to the
    /// peer handler so that foreign paths get a `400` rather than a `404`.
    pub fn router(self: Arc<Self>, groups: Arc<GroupRegistry>) -> Router {
        Router::new()
            .fallback(handle_peer_request)
            .layer(Extension(groups))
            .layer(Extension(self))
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>> {
        let peers = self.peers.read();
        let peer = peers.ring.get(key)?;
        if peer == self.self_addr {
            return None;
        }
        tracing::info!("[Server {}] Pick peer {}", self.self_addr, peer);
        let fetcher = peers.fetchers.get(peer)?.clone();
        Some(fetcher as Arc<dyn PeerFetcher>)
    }
}
