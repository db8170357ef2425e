//! Consistent hash ring with virtual replicas.
//!
//! Each peer is placed on the ring `replicas` times at `hash("{i}{peer}")`.
//! A key belongs to the first point clockwise from `hash(key)`, wrapping to
//! the lowest point past the end.

/// Maps a byte string to a ring position.
pub type HashFn = fn(&[u8]) -> u32;

pub const DEFAULT_REPLICAS: usize = 50;

/// CRC-32 (IEEE), the default ring hash.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted by hash.
    points: Vec<(u32, String)>,
}

impl HashRing {
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32),
            replicas,
            points: Vec::new(),
        }
    }

    /// Places each peer on the ring `replicas` times.
    pub fn add<S: AsRef<str>>(&mut self, peers: &[S]) {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let point = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.points.push((point, peer.to_string()));
            }
        }
        // Stable, so colliding points keep the peer that was added first.
        self.points.sort_by_key(|(point, _)| *point);
    }

    /// Returns the peer owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|(point, _)| *point < hash);
        let (_, peer) = &self.points[idx % self.points.len()];
        Some(peer.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, None)
    }
}
