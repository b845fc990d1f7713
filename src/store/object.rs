//! Object Store Module
//!
//! Process-local object cache: TTL-aware, supports bulk clear,
//! increment/decrement and hit/miss statistics.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;
use crate::store::entry::{EntryTable, StoreEntry};
use crate::store::{CacheStats, Store};
use crate::value::CacheValue;

// == Object Store ==
/// In-process object cache.
///
/// TTL semantics: `None` or `0` keeps a value until deleted, a negative TTL
/// stores an entry that reads as expired immediately.
#[derive(Debug)]
pub struct ObjectStore {
    /// Key-value storage
    entries: EntryTable,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
    /// Read statistics, None when collection is disabled
    stats: Option<Mutex<CacheStats>>,
}

impl ObjectStore {
    // == Constructor ==
    /// Creates an empty store with statistics collection enabled.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: EntryTable::default(),
            clock,
            stats: Some(Mutex::new(CacheStats::new())),
        }
    }

    /// Creates an empty store that keeps no statistics.
    pub fn without_stats(clock: Arc<dyn Clock>) -> Self {
        Self {
            stats: None,
            ..Self::new(clock)
        }
    }

    // == Stats ==
    /// Returns current statistics, or None when collection is disabled.
    pub fn stats(&self) -> Option<CacheStats> {
        self.stats.as_ref().map(|stats| {
            let mut snapshot = stats.lock().clone();
            snapshot.set_total_entries(self.entries.len());
            snapshot
        })
    }

    // == Increment / Decrement ==
    /// Adds `offset` to an integer value, clamping at zero.
    ///
    /// # Returns
    /// - `None` if the key is absent, expired or does not hold an integer
    /// - `Some(new_value)` otherwise; the entry keeps its expiration
    pub fn increment(&mut self, key: &str, offset: i64) -> Option<i64> {
        let now = self.clock.now();
        let entry = self.entries.live_mut(key, now)?;
        let current = entry.value.as_int()?;
        let next = current.saturating_add(offset).max(0);
        entry.value = CacheValue::Int(next);
        Some(next)
    }

    /// Subtracts `offset` from an integer value, clamping at zero.
    pub fn decrement(&mut self, key: &str, offset: i64) -> Option<i64> {
        self.increment(key, offset.saturating_neg())
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let removed = self.entries.purge_expired(self.clock.now());
        if let Some(stats) = &self.stats {
            stats.lock().record_purged(removed);
        }
        if removed > 0 {
            debug!(removed, "object store purged expired entries");
        }
        removed
    }

    /// Number of entries held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entry is held, expired or not.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }
}

impl Store for ObjectStore {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        let value = self
            .entries
            .live(key, self.clock.now())
            .map(|entry| entry.value.clone());

        if let Some(stats) = &self.stats {
            let mut stats = stats.lock();
            if value.is_some() {
                stats.record_hit();
            } else {
                stats.record_miss();
            }
        }

        Ok(value)
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        let entry = StoreEntry::new(value, ttl, self.clock.now());
        self.entries.insert(key, entry);
        Ok(true)
    }

    /// Replaces the value only if the key currently holds a live one.
    fn update(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        let now = self.clock.now();
        if self.entries.live(key, now).is_none() {
            return Ok(false);
        }
        self.entries.insert(key, StoreEntry::new(value, ttl, now));
        Ok(true)
    }

    /// Always succeeds: the key is gone afterwards whether or not it existed.
    fn delete(&mut self, key: &str) -> Result<bool> {
        self.entries.remove(key);
        Ok(true)
    }

    fn clear(&mut self) -> Option<bool> {
        self.entries.clear();
        Some(true)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn store() -> (ManualClock, ObjectStore) {
        let clock = ManualClock::at_timestamp(1_000);
        let store = ObjectStore::new(Arc::new(clock.clone()));
        (clock, store)
    }

    #[test]
    fn test_set_and_get() {
        let (_, mut store) = store();

        assert!(store.set("key1", "value1".into(), None).unwrap());
        assert_eq!(store.get("key1").unwrap(), Some("value1".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let (_, store) = store();
        assert_eq!(store.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_falsy_values_are_present() {
        let (_, mut store) = store();

        for (key, value) in [
            ("zero", CacheValue::Int(0)),
            ("false", CacheValue::Bool(false)),
            ("empty", CacheValue::Text(String::new())),
            ("null", CacheValue::Null),
        ] {
            store.set(key, value.clone(), None).unwrap();
            assert_eq!(store.get(key).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_ttl_expiration() {
        let (clock, mut store) = store();

        store.set("key1", "value1".into(), Some(1)).unwrap();
        assert!(store.get("key1").unwrap().is_some());

        clock.advance(1);
        assert_eq!(store.get("key1").unwrap(), None);
    }

    #[test]
    fn test_negative_ttl_reads_as_expired() {
        let (_, mut store) = store();
        store.set("key1", "value1".into(), Some(-1)).unwrap();
        assert_eq!(store.get("key1").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let (_, mut store) = store();

        store.set("key1", "value1".into(), None).unwrap();
        store.set("key1", "value2".into(), None).unwrap();

        assert_eq!(store.get("key1").unwrap(), Some("value2".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_requires_live_key() {
        let (clock, mut store) = store();

        assert!(!store.update("key1", "v".into(), None).unwrap());
        assert_eq!(store.get("key1").unwrap(), None);

        store.set("key1", "v".into(), Some(5)).unwrap();
        assert!(store.update("key1", "w".into(), Some(5)).unwrap());
        assert_eq!(store.get("key1").unwrap(), Some("w".into()));

        clock.advance(5);
        assert!(!store.update("key1", "x".into(), None).unwrap());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_, mut store) = store();

        store.set("key1", "value1".into(), None).unwrap();
        assert!(store.delete("key1").unwrap());
        assert!(store.delete("key1").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let (_, mut store) = store();
        store.set("a", 1.into(), None).unwrap();
        store.set("b", 2.into(), None).unwrap();

        assert_eq!(store.clear(), Some(true));
        assert!(store.is_empty());
    }

    #[test]
    fn test_bulk_operations() {
        let (clock, mut store) = store();

        let values = vec![("a".to_string(), CacheValue::Int(0)), ("b".to_string(), "v".into())];
        assert!(store.set_multiple(values, Some(10)).unwrap());
        assert_eq!(
            store.get_multiple(&["a", "missing"], None).unwrap(),
            vec![("a".to_string(), Some(CacheValue::Int(0))), ("missing".to_string(), None)]
        );

        clock.advance(10);
        assert_eq!(
            store.get_multiple(&["a", "b"], Some(CacheValue::Null)).unwrap(),
            vec![("a".to_string(), Some(CacheValue::Null)), ("b".to_string(), Some(CacheValue::Null))]
        );
        assert!(store.delete_multiple(&["a", "b", "never-set"]).unwrap());
    }

    #[test]
    fn test_increment_and_decrement() {
        let (_, mut store) = store();
        store.set("counter", 5.into(), None).unwrap();

        assert_eq!(store.increment("counter", 3), Some(8));
        assert_eq!(store.decrement("counter", 10), Some(0));
        assert_eq!(store.increment("missing", 1), None);

        store.set("text", "five".into(), None).unwrap();
        assert_eq!(store.increment("text", 1), None);
    }

    #[test]
    fn test_stats() {
        let (clock, mut store) = store();

        store.set("key1", "value1".into(), Some(10)).unwrap();
        store.get("key1").unwrap(); // hit
        store.get("nonexistent").unwrap(); // miss

        clock.advance(10);
        assert_eq!(store.purge_expired(), 1);

        let stats = store.stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.purged, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_without_stats() {
        let store = ObjectStore::without_stats(Arc::new(ManualClock::at_timestamp(0)));
        store.get("k").unwrap();
        assert!(store.stats().is_none());
    }
}
