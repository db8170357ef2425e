//! Property-based tests for the admission-controlled eviction cache.
//!
//! Drives random add/get sequences against `EvictionCache` and checks the
//! budget and bookkeeping invariants after every step. With `k = 1` the cache
//! is also compared against a plain LRU model.
//!
//! Run with: `cargo test --test cache_properties`

use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use peercache::EvictionCache;

// =============================================================================
// Strategies for generating test data
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(String, String),
    Get(String),
}

/// Keys are drawn from a small space so that hits, updates and promotions happen often.
fn key_strategy() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|i| format!("k{}", i))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (key_strategy(), "[a-z]{0,10}").prop_map(|(k, v)| Op::Add(k, v)),
        key_strategy().prop_map(Op::Get),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..200)
}

// =============================================================================
// Helpers
// =============================================================================

type Evicted = Arc<Mutex<Vec<String>>>;

fn recording_cache(max_bytes: usize, history_bytes: usize, k: usize) -> (EvictionCache<String>, Evicted) {
    let evicted: Evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = evicted.clone();
    let cache = EvictionCache::new(max_bytes, history_bytes, k)
        .with_on_evicted(move |key, _value| sink.lock().push(key));
    (cache, evicted)
}

fn present_keys(cache: &EvictionCache<String>) -> BTreeSet<String> {
    cache
        .keys()
        .chain(cache.history_keys())
        .map(str::to_string)
        .collect()
}

fn apply(cache: &mut EvictionCache<String>, op: &Op) {
    match op {
        Op::Add(key, value) => cache.add(key, value.clone()),
        Op::Get(key) => {
            cache.get(key);
        }
    }
}

/// Reference LRU: front is most recently used.
struct LruModel {
    entries: Vec<(String, usize)>,
    max_bytes: usize,
    evicted: Vec<String>,
}

impl LruModel {
    fn bytes(&self) -> usize {
        self.entries.iter().map(|(k, len)| k.len() + len).sum()
    }

    fn touch(&mut self, key: &str) -> Option<(String, usize)> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos))
    }

    fn apply(&mut self, op: &Op) {
        match op {
            Op::Add(key, value) => {
                self.touch(key);
                self.entries.insert(0, (key.clone(), value.len()));
                while self.max_bytes != 0 && self.bytes() > self.max_bytes {
                    if let Some((k, _)) = self.entries.pop() {
                        self.evicted.push(k);
                    }
                }
            }
            Op::Get(key) => {
                if let Some(entry) = self.touch(key) {
                    self.entries.insert(0, entry);
                }
            }
        }
    }
}

// =============================================================================
// Property tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Neither queue ever ends a call above its budget, and the byte counters
    /// always match the entries actually stored.
    #[test]
    fn budgets_and_byte_accounting_hold(
        ops in ops_strategy(),
        max_bytes in 0usize..40,
        history_bytes in 0usize..40,
        k in 0usize..4,
    ) {
        let (mut cache, _evicted) = recording_cache(max_bytes, history_bytes, k);
        let mut last_value: HashMap<String, usize> = HashMap::new();

        for op in &ops {
            apply(&mut cache, op);
            if let Op::Add(key, value) = op {
                last_value.insert(key.clone(), value.len());
            }

            if max_bytes != 0 {
                prop_assert!(cache.bytes() <= max_bytes);
            }
            if history_bytes != 0 {
                prop_assert!(cache.history_bytes() <= history_bytes);
            }

            let main_bytes: usize = cache.keys().map(|key| key.len() + last_value[key]).sum();
            let history_total: usize = cache.history_keys().map(|key| key.len() + last_value[key]).sum();
            prop_assert_eq!(cache.bytes(), main_bytes);
            prop_assert_eq!(cache.history_bytes(), history_total);
            prop_assert_eq!(cache.len(), cache.keys().count());
            prop_assert_eq!(cache.history_len(), cache.history_keys().count());
        }
    }

    /// A key lives in at most one queue, and probation counters exist exactly
    /// for history keys and stay below the threshold.
    #[test]
    fn queues_are_disjoint_and_counters_consistent(
        ops in ops_strategy(),
        max_bytes in 0usize..40,
        history_bytes in 0usize..40,
        k in 1usize..4,
    ) {
        let (mut cache, _evicted) = recording_cache(max_bytes, history_bytes, k);

        for op in &ops {
            apply(&mut cache, op);

            for i in 0..8 {
                let key = format!("k{}", i);
                prop_assert!(!(cache.contains(&key) && cache.in_history(&key)));

                match cache.history_hits(&key) {
                    Some(hits) => {
                        prop_assert!(cache.in_history(&key));
                        prop_assert!(hits >= 1 && hits < k);
                    }
                    None => prop_assert!(!cache.in_history(&key)),
                }
            }
        }
    }

    /// Entries only disappear through the eviction callback. Promotion moves
    /// a key between queues without reporting it.
    #[test]
    fn entries_only_leave_through_eviction(
        ops in ops_strategy(),
        max_bytes in 0usize..40,
        history_bytes in 0usize..40,
        k in 1usize..4,
    ) {
        let (mut cache, evicted) = recording_cache(max_bytes, history_bytes, k);

        for op in &ops {
            let mut expected = present_keys(&cache);
            if let Op::Add(key, _) = op {
                expected.insert(key.clone());
            }

            apply(&mut cache, op);

            let gone: Vec<String> = evicted.lock().drain(..).collect();
            for key in &gone {
                expected.remove(key);
            }
            prop_assert_eq!(present_keys(&cache), expected);
        }
    }

    /// With `k = 1` and entries that always fit, the cache is a plain LRU:
    /// same recency order and same eviction sequence.
    #[test]
    fn single_hit_admission_matches_lru(
        ops in ops_strategy(),
        max_bytes in prop_oneof![Just(0usize), 12usize..60],
    ) {
        let (mut cache, evicted) = recording_cache(max_bytes, max_bytes, 1);
        let mut model = LruModel { entries: Vec::new(), max_bytes, evicted: Vec::new() };

        for op in &ops {
            apply(&mut cache, op);
            model.apply(op);

            let keys: Vec<&str> = cache.keys().collect();
            let model_keys: Vec<&str> = model.entries.iter().map(|(k, _)| k.as_str()).collect();
            prop_assert_eq!(keys, model_keys);
            prop_assert_eq!(cache.history_len(), 0);
        }

        prop_assert_eq!(&*evicted.lock(), &model.evicted);
    }
}
