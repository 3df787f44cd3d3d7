//! In-memory TTL store.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tokencache_core::constants::DEFAULT_MAX_ENTRIES;

/// Upper bound applied to TTLs so `now + ttl` cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Stored value with its absolute expiry.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of entries (0 = unbounded)
    pub max_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl StoreConfig {
    /// Configuration without a capacity bound.
    pub fn unbounded() -> Self {
        Self { max_entries: 0 }
    }
}

/// Generic in-memory store with per-entry expiry.
///
/// Thread-safe. Reads take a shared lock; writes and evictions take the
/// exclusive lock, so `get`, `set` and `delete` are atomic with respect to
/// one another.
pub struct TtlStore<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    config: StoreConfig,
}

impl<V: Clone> TtlStore<V> {
    /// Creates a store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a store with custom configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Gets a value by key.
    ///
    /// Returns `None` if the key is absent or its entry has expired. An
    /// expired entry is removed before returning.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired_at(Instant::now()) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Expired on the read path. Re-check under the write lock: another
        // caller may have stored a fresh value in between.
        let mut entries = self.entries.write();
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                debug!(key, "Evicted expired entry on read");
                None
            }
            None => None,
        }
    }

    /// Stores a value that expires `ttl` from now.
    ///
    /// A zero TTL stores an entry that is already expired. Any existing entry
    /// for `key` is replaced.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let expires_at = Instant::now() + ttl.min(MAX_TTL);

        let mut entries = self.entries.write();

        if self.config.max_entries > 0
            && entries.len() >= self.config.max_entries
            && !entries.contains_key(&key)
        {
            Self::make_room(&mut entries, self.config.max_entries);
        }

        entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Stores a value with a TTL in whole seconds.
    ///
    /// Non-positive values are treated as "expires immediately".
    pub fn set_secs(&self, key: impl Into<String>, value: V, ttl_seconds: i64) {
        let ttl = Duration::from_secs(ttl_seconds.max(0) as u64);
        self.set(key, value, ttl);
    }

    /// Removes an entry. Returns true if one was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Removes every entry matching `predicate` under a single write lock.
    ///
    /// Returns the number of entries removed, live or expired.
    pub fn remove_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&str, &V) -> bool,
    {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, entry| !predicate(key, &entry.value));
        before - entries.len()
    }

    /// Removes all expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        Self::purge_expired_internal(&mut entries)
    }

    fn purge_expired_internal(entries: &mut HashMap<String, CacheEntry<V>>) -> usize {
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    fn make_room(entries: &mut HashMap<String, CacheEntry<V>>, max_entries: usize) {
        let purged = Self::purge_expired_internal(entries);
        if purged > 0 {
            debug!(purged, "Purged expired entries at capacity");
        }

        // Still full? Drop whatever expires soonest.
        if entries.len() >= max_entries {
            if let Some(victim) = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&victim);
                debug!(key = %victim, max_entries, "Evicted entry at capacity");
            }
        }
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of stored entries, including expired ones not yet
    /// evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns entry counts classified by expiry.
    ///
    /// Read-only: expired entries are counted, not evicted.
    pub fn stats(&self) -> StoreStats {
        let entries = self.entries.read();
        let now = Instant::now();
        let expired = entries.values().filter(|e| e.is_expired_at(now)).count();

        StoreStats {
            total_entries: entries.len(),
            live_entries: entries.len() - expired,
            expired_entries: expired,
        }
    }

    /// Like [`stats`](Self::stats), additionally counting live entries per
    /// group. Both results come from the same snapshot.
    pub fn stats_grouped<K, F>(&self, group: F) -> (StoreStats, HashMap<K, usize>)
    where
        K: Eq + Hash,
        F: Fn(&V) -> K,
    {
        let entries = self.entries.read();
        let now = Instant::now();

        let mut groups = HashMap::new();
        let mut expired = 0;
        for entry in entries.values() {
            if entry.is_expired_at(now) {
                expired += 1;
            } else {
                *groups.entry(group(&entry.value)).or_insert(0) += 1;
            }
        }

        let stats = StoreStats {
            total_entries: entries.len(),
            live_entries: entries.len() - expired,
            expired_entries: expired,
        };
        (stats, groups)
    }
}

impl<V: Clone> Default for TtlStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Store statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Entries not yet expired
    pub live_entries: usize,
    /// Expired entries awaiting eviction
    pub expired_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_store_set_get() {
        let store = TtlStore::new();
        store.set("alpha", 42u32, HOUR);
        assert_eq!(store.get("alpha"), Some(42));
    }

    #[test]
    fn test_store_miss() {
        let store: TtlStore<u32> = TtlStore::new();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let store = TtlStore::new();
        store.set("alpha", "first".to_string(), HOUR);
        store.set("alpha", "second".to_string(), HOUR);
        assert_eq!(store.get("alpha").as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_delete() {
        let store = TtlStore::new();
        store.set("alpha", 1u8, HOUR);

        assert!(store.delete("alpha"));
        assert!(!store.delete("alpha"));
        assert!(store.get("alpha").is_none());
    }

    #[test]
    fn test_store_clear() {
        let store = TtlStore::new();
        store.set("alpha", 1u8, HOUR);
        store.set("beta", 2u8, HOUR);

        store.clear();

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_ttl_expiration() {
        let store = TtlStore::new();

        store.set("alpha", 1u8, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));

        assert!(store.get("alpha").is_none());
    }

    #[test]
    fn test_store_zero_ttl_expires_immediately() {
        let store = TtlStore::new();
        store.set("alpha", 1u8, Duration::ZERO);
        assert!(store.get("alpha").is_none());
    }

    #[test]
    fn test_store_non_positive_secs() {
        let store = TtlStore::new();
        store.set_secs("zero", 1u8, 0);
        store.set_secs("negative", 2u8, -30);
        store.set_secs("positive", 3u8, 60);

        assert!(store.get("zero").is_none());
        assert!(store.get("negative").is_none());
        assert_eq!(store.get("positive"), Some(3));
    }

    #[test]
    fn test_store_get_evicts_expired() {
        let store = TtlStore::new();
        store.set("alpha", 1u8, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(store.len(), 1);
        assert!(store.get("alpha").is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_stats_does_not_evict() {
        let store = TtlStore::new();
        store.set("alpha", 1u8, Duration::from_millis(1));
        store.set("beta", 2u8, HOUR);
        std::thread::sleep(Duration::from_millis(10));

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.live_entries, 1);
        assert_eq!(stats.expired_entries, 1);

        // Asking twice changes nothing
        assert_eq!(store.stats(), stats);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_purge_expired() {
        let store = TtlStore::new();

        store.set("alpha", 1u8, Duration::from_millis(1));
        store.set("beta", 2u8, HOUR);
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("beta"), Some(2));
    }

    #[test]
    fn test_store_remove_where() {
        let store = TtlStore::new();
        store.set("a:1", 1u8, HOUR);
        store.set("a:2", 2u8, HOUR);
        store.set("b:1", 3u8, HOUR);

        let removed = store.remove_where(|key, _| key.starts_with("a:"));

        assert_eq!(removed, 2);
        assert!(store.get("a:1").is_none());
        assert!(store.get("a:2").is_none());
        assert_eq!(store.get("b:1"), Some(3));
    }

    #[test]
    fn test_store_stats_grouped() {
        let store = TtlStore::new();
        store.set("a", "x", HOUR);
        store.set("b", "x", HOUR);
        store.set("c", "y", HOUR);
        store.set("d", "y", Duration::ZERO);

        let (stats, groups) = store.stats_grouped(|v| *v);

        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.live_entries, 3);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(groups.get("x"), Some(&2));
        assert_eq!(groups.get("y"), Some(&1));
    }

    #[test]
    fn test_store_capacity_eviction() {
        let store = TtlStore::with_config(StoreConfig { max_entries: 2 });

        store.set("alpha", 1u8, Duration::from_secs(10));
        store.set("beta", 2u8, HOUR);
        store.set("gamma", 3u8, HOUR);

        // Soonest-expiring entry made room
        assert_eq!(store.len(), 2);
        assert!(store.get("alpha").is_none());
        assert_eq!(store.get("gamma"), Some(3));
    }

    #[test]
    fn test_store_capacity_prefers_expired() {
        let store = TtlStore::with_config(StoreConfig { max_entries: 2 });

        store.set("alpha", 1u8, HOUR);
        store.set("beta", 2u8, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        store.set("gamma", 3u8, HOUR);

        assert_eq!(store.get("alpha"), Some(1));
        assert_eq!(store.get("gamma"), Some(3));
    }

    #[test]
    fn test_store_capacity_overwrite_keeps_others() {
        let store = TtlStore::with_config(StoreConfig { max_entries: 2 });

        store.set("alpha", 1u8, HOUR);
        store.set("beta", 2u8, HOUR);
        store.set("alpha", 10u8, HOUR);

        assert_eq!(store.get("alpha"), Some(10));
        assert_eq!(store.get("beta"), Some(2));
    }

    #[test]
    fn test_store_unbounded() {
        let store = TtlStore::with_config(StoreConfig::unbounded());
        for i in 0..10_010 {
            store.set(i.to_string(), i, HOUR);
        }
        assert_eq!(store.len(), 10_010);
    }

    #[test]
    fn test_store_default_never_evicts_live() {
        let store = TtlStore::new();
        for i in 0..10_001 {
            store.set(i.to_string(), i, HOUR);
        }

        let stats = store.stats();
        assert_eq!(stats.live_entries, 10_001);
        assert_eq!(store.get("0"), Some(0));
    }

    #[test]
    fn test_store_concurrent_access() {
        let store = Arc::new(TtlStore::with_config(StoreConfig::unbounded()));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..500 {
                        let key = format!("{}-{}", t, i % 50);
                        store.set(key.clone(), i, HOUR);
                        assert!(store.get(&key).is_some());
                        if i % 7 == 0 {
                            store.delete(&key);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = store.stats();
        assert_eq!(stats.total_entries, stats.live_entries);
        assert!(stats.total_entries <= 8 * 50);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_set_then_get(key in "[a-z0-9:]{1,16}", value in any::<u64>(), ttl in 1u64..86_400) {
                let store = TtlStore::new();
                store.set(key.clone(), value, Duration::from_secs(ttl));
                prop_assert_eq!(store.get(&key), Some(value));
            }

            #[test]
            fn prop_last_write_wins(key in "[a-z]{1,8}", first in any::<u32>(), second in any::<u32>()) {
                let store = TtlStore::new();
                store.set(key.clone(), first, HOUR);
                store.set(key.clone(), second, HOUR);
                prop_assert_eq!(store.get(&key), Some(second));
                prop_assert_eq!(store.len(), 1);
            }
        }
    }
}
