//! In-memory TTL query cache.
//!
//! Keys are `table:signature` strings. The cache is bounded: when full,
//! the single oldest-inserted entry is evicted (insertion order, not
//! access order). Reads past the TTL remove the stale entry and miss.
//! Invalidation is substring-based and coarse: any write to a table blows
//! away every key containing the table name. There is no per-key locking
//! and no stampede protection; concurrent misses for one key all hit the
//! backend.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

/// Default time-to-live for cached entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
/// Default maximum number of entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

#[derive(Default)]
struct CacheState {
    map: HashMap<String, CacheEntry>,
    /// Keys in insertion order; front is evicted first.
    order: VecDeque<String>,
}

/// Counter snapshot for instrumentation.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
}

/// Bounded TTL cache for query results.
pub struct QueryCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Build the canonical `table:signature` key.
    pub fn key(table: &str, signature: &str) -> String {
        format!("{table}:{signature}")
    }

    /// Look up a key. A stale entry is removed and counts as a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        enum Lookup {
            Missing,
            Stale,
            Fresh(Value),
        }

        let mut state = self.lock();
        let lookup = match state.map.get(key) {
            None => Lookup::Missing,
            Some(entry) if entry.inserted_at.elapsed() > self.config.ttl => Lookup::Stale,
            Some(entry) => Lookup::Fresh(entry.value.clone()),
        };
        match lookup {
            Lookup::Missing => {
                drop(state);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Lookup::Stale => {
                state.map.remove(key);
                state.order.retain(|k| k != key);
                drop(state);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Lookup::Fresh(value) => {
                drop(state);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
        }
    }

    /// Insert or refresh a key. Refreshing moves the key to the back of
    /// the eviction order.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let mut state = self.lock();
        if state.map.contains_key(&key) {
            state.order.retain(|k| k != &key);
        } else if state.map.len() >= self.config.max_entries {
            if let Some(oldest) = state.order.pop_front() {
                state.map.remove(&oldest);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        state.order.push_back(key.clone());
        state.map.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove entries. `None` clears everything; `Some(pattern)` removes
    /// every key containing the substring. Returns the number removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut state = self.lock();
        let removed = match pattern {
            None => {
                let n = state.map.len();
                state.map.clear();
                state.order.clear();
                n
            }
            Some(pattern) => {
                let doomed: Vec<String> = state
                    .map
                    .keys()
                    .filter(|key| key.contains(pattern))
                    .cloned()
                    .collect();
                for key in &doomed {
                    state.map.remove(key);
                }
                state.order.retain(|key| !key.contains(pattern));
                doomed.len()
            }
        };
        drop(state);
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.lock().map.len();
        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache(ttl_ms: u64, max: usize) -> QueryCache {
        QueryCache::new(CacheConfig {
            ttl: Duration::from_millis(ttl_ms),
            max_entries: max,
        })
    }

    #[test]
    fn get_after_ttl_returns_none_and_removes_entry() {
        let cache = cache(10, 10);
        cache.set("buildings:1", json!({"building_id": "BLDG_1"}));
        assert!(cache.get("buildings:1").is_some());

        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get("buildings:1").is_none());
        // Entry is gone, not lazily retained.
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn eviction_removes_single_oldest_inserted_entry() {
        let cache = cache(60_000, 2);
        cache.set("a:1", json!(1));
        cache.set("b:2", json!(2));
        cache.set("c:3", json!(3));

        assert!(cache.get("a:1").is_none());
        assert!(cache.get("b:2").is_some());
        assert!(cache.get("c:3").is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn pattern_invalidation_removes_substring_matches_only() {
        let cache = cache(60_000, 10);
        cache.set("buildings:1", json!(1));
        cache.set("buildings:list:{}", json!(2));
        cache.set("rooms:1", json!(3));

        let removed = cache.invalidate(Some("buildings"));
        assert_eq!(removed, 2);
        assert!(cache.get("buildings:1").is_none());
        assert!(cache.get("rooms:1").is_some());
    }

    #[test]
    fn invalidate_everything_is_idempotent() {
        let cache = cache(60_000, 10);
        cache.set("a:1", json!(1));
        assert_eq!(cache.invalidate(None), 1);
        assert_eq!(cache.invalidate(None), 0);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn refresh_moves_key_to_back_of_eviction_order() {
        let cache = cache(60_000, 2);
        cache.set("a:1", json!(1));
        cache.set("b:2", json!(2));
        cache.set("a:1", json!(10));
        cache.set("c:3", json!(3));

        // "b" was oldest after the refresh of "a".
        assert!(cache.get("b:2").is_none());
        assert_eq!(cache.get("a:1"), Some(json!(10)));
    }
}
