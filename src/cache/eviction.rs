//! Admission-controlled eviction cache.
//!
//! Two byte-budgeted queues share one key space:
//!
//! ```text
//!   history (FIFO, probation)              main (LRU, protected)
//!   front                     back         front                  back
//!   [oldest] ◄──► ... ◄──► [newest]        [MRU] ◄──► ... ◄──► [LRU]
//!      │                                                          │
//!      └── evicted first                          evicted first ──┘
//! ```
//!
//! New keys enter the back of the history queue. A key that has been observed
//! `k` times while in history (through `get` or repeated `add`) is promoted to
//! the front of the main queue. With `k == 1` every add is promoted at once and
//! the cache behaves as a plain LRU.
//!
//! A budget of `0` means the queue is unbounded. Promotion moves an entry and
//! never fires the eviction callback; only budget-driven removals do.

use std::collections::HashMap;
use std::fmt;

use super::list::EntryList;

/// Anything that can be charged against a byte budget.
pub trait Value {
    fn byte_len(&self) -> usize;
}

impl Value for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Value for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// Invoked with the owned key and value of every entry dropped for capacity.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

fn entry_size<V: Value>(key: &str, value: &V) -> usize {
    key.len() + value.byte_len()
}

struct Queue<V> {
    entries: EntryList<V>,
    index: HashMap<String, usize>,
    used_bytes: usize,
    max_bytes: usize,
}

impl<V: Value> Queue<V> {
    fn new(max_bytes: usize) -> Self {
        Self {
            entries: EntryList::new(),
            index: HashMap::new(),
            used_bytes: 0,
            max_bytes,
        }
    }

    fn over_budget(&self) -> bool {
        self.max_bytes != 0 && self.used_bytes > self.max_bytes
    }

    fn slot(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn push_front(&mut self, key: String, value: V) {
        self.used_bytes += entry_size(&key, &value);
        let slot = self.entries.push_front(key.clone(), value);
        self.index.insert(key, slot);
    }

    fn push_back(&mut self, key: String, value: V) {
        self.used_bytes += entry_size(&key, &value);
        let slot = self.entries.push_back(key.clone(), value);
        self.index.insert(key, slot);
    }

    fn replace(&mut self, slot: usize, value: V) {
        let new_len = value.byte_len();
        let old = self.entries.replace(slot, value);
        self.used_bytes = self.used_bytes - old.byte_len() + new_len;
    }

    fn remove(&mut self, slot: usize) -> (String, V) {
        let (key, value) = self.entries.remove(slot);
        self.index.remove(&key);
        self.used_bytes -= entry_size(&key, &value);
        (key, value)
    }
}

/// Byte-budgeted LRU cache fronted by a FIFO admission queue.
///
/// Not synchronized; see [`CacheShard`](super::shard::CacheShard) for the
/// locked wrapper.
pub struct EvictionCache<V> {
    main: Queue<V>,
    history: Queue<V>,
    hits: HashMap<String, usize>,
    k: usize,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V> EvictionCache<V>
where
    V: Value + Clone,
{
    /// Creates a cache with independent budgets for the main and history
    /// queues. `k` is the number of observations needed for promotion; `0` is
    /// treated as `1`.
    pub fn new(max_bytes: usize, history_max_bytes: usize, k: usize) -> Self {
        Self {
            main: Queue::new(max_bytes),
            history: Queue::new(history_max_bytes),
            hits: HashMap::new(),
            k: k.max(1),
            on_evicted: None,
        }
    }

    pub fn with_on_evicted<F>(mut self, callback: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(callback));
        self
    }

    /// Looks up a key.
    ///
    /// A main-queue hit refreshes recency. A history hit counts as one
    /// observation: the entry is promoted once it reaches `k`, otherwise it is
    /// moved to the back of the FIFO. History hits are returned to the caller
    /// either way.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if let Some(slot) = self.main.slot(key) {
            self.main.entries.move_to_front(slot);
            return Some(self.main.entries.value(slot).clone());
        }

        let slot = self.history.slot(key)?;
        let hits = self.bump(key);
        let value = self.history.entries.value(slot).clone();
        if hits >= self.k {
            self.promote(slot);
        } else {
            self.history.entries.move_to_back(slot);
        }
        Some(value)
    }

    /// Inserts or updates a key.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(slot) = self.main.slot(key) {
            self.main.replace(slot, value);
            self.main.entries.move_to_front(slot);
            self.evict_main_overflow();
            return;
        }

        match self.history.slot(key) {
            Some(slot) => {
                self.history.replace(slot, value);
                self.history.entries.move_to_back(slot);
                self.bump(key);
            }
            None => {
                self.history.push_back(key.to_owned(), value);
                self.hits.insert(key.to_owned(), 1);
            }
        }
        self.evict_history_overflow();

        // The key may have been the one evicted above.
        if let Some(slot) = self.history.slot(key) {
            if self.hits.get(key).copied().unwrap_or(0) >= self.k {
                self.promote(slot);
            }
        }
    }

    /// Number of entries in the main queue. History entries are not counted.
    pub fn len(&self) -> usize {
        self.main.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn history_len(&self) -> usize {
        self.history.entries.len()
    }

    /// Bytes charged against the main budget.
    pub fn bytes(&self) -> usize {
        self.main.used_bytes
    }

    pub fn history_bytes(&self) -> usize {
        self.history.used_bytes
    }

    pub fn contains(&self, key: &str) -> bool {
        self.main.index.contains_key(key)
    }

    pub fn in_history(&self, key: &str) -> bool {
        self.history.index.contains_key(key)
    }

    /// Observation count of a key currently on probation.
    pub fn history_hits(&self, key: &str) -> Option<usize> {
        self.hits.get(key).copied()
    }

    /// Main-queue keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.main.entries.keys()
    }

    /// History keys from oldest to newest.
    pub fn history_keys(&self) -> impl Iterator<Item = &str> {
        self.history.entries.keys()
    }

    /// Evicts the least recently used main entry, if any.
    pub fn remove_oldest(&mut self) {
        if let Some(slot) = self.main.entries.back() {
            let (key, value) = self.main.remove(slot);
            self.notify_evicted(key, value);
        }
    }

    /// Evicts the oldest history entry, if any.
    pub fn remove_history_oldest(&mut self) {
        if let Some(slot) = self.history.entries.front() {
            let (key, value) = self.history.remove(slot);
            self.hits.remove(&key);
            self.notify_evicted(key, value);
        }
    }

    fn bump(&mut self, key: &str) -> usize {
        let hits = self.hits.entry(key.to_owned()).or_insert(0);
        *hits += 1;
        *hits
    }

    /// Moves a history entry to the front of the main queue, carrying its stored value.
    fn promote(&mut self, slot: usize) {
        let (key, value) = self.history.remove(slot);
        self.hits.remove(&key);
        self.main.push_front(key, value);
        self.evict_main_overflow();
    }

    fn evict_main_overflow(&mut self) {
        while self.main.over_budget() && self.main.entries.len() > 0 {
            self.remove_oldest();
        }
    }

    fn evict_history_overflow(&mut self) {
        while self.history.over_budget() && self.history.entries.len() > 0 {
            self.remove_history_oldest();
        }
    }

    fn notify_evicted(&mut self, key: String, value: V) {
        tracing::trace!("Evicted {} ({} bytes)", key, value.byte_len());
        if let Some(callback) = self.on_evicted.as_mut() {
            callback(key, value);
        }
    }
}

impl<V> fmt::Debug for EvictionCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvictionCache")
            .field("len", &self.main.entries.len())
            .field("bytes", &self.main.used_bytes)
            .field("max_bytes", &self.main.max_bytes)
            .field("history_len", &self.history.entries.len())
            .field("history_bytes", &self.history.used_bytes)
            .field("history_max_bytes", &self.history.max_bytes)
            .field("k", &self.k)
            .finish()
    }
}
