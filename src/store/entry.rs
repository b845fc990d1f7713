//! Store Entry Module
//!
//! Defines the structure for individual entries held by the in-process
//! store adapters, with TTL support measured against a [`Clock`].
//!
//! [`Clock`]: crate::clock::Clock

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::value::CacheValue;

// == Store Entry ==
/// A single stored value with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreEntry {
    /// The stored value
    pub value: CacheValue,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry written at `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - `None` or `Some(0)` keeps the entry until deleted;
    ///   a negative TTL produces an entry that is already expired
    /// * `now` - The write instant
    pub fn new(value: CacheValue, ttl_seconds: Option<i64>, now: DateTime<Utc>) -> Self {
        let expires_at = match ttl_seconds {
            None | Some(0) => None,
            Some(ttl) => Some(
                TimeDelta::try_seconds(ttl)
                    .and_then(|delta| now.checked_add_signed(delta))
                    .unwrap_or(if ttl > 0 {
                        DateTime::<Utc>::MAX_UTC
                    } else {
                        DateTime::<Utc>::MIN_UTC
                    }),
            ),
        };

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches its expiration instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in whole seconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_seconds)` if it hasn't
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at
            .map(|expires| (expires.timestamp() - now.timestamp()).max(0))
    }
}

// == Entry Table ==
/// Keyed entry storage shared by the TTL-aware adapters.
#[derive(Debug, Default)]
pub(crate) struct EntryTable {
    entries: HashMap<String, StoreEntry>,
}

impl EntryTable {
    /// Returns the live entry for `key`, ignoring expired ones.
    pub fn live(&self, key: &str, now: DateTime<Utc>) -> Option<&StoreEntry> {
        self.entries.get(key).filter(|entry| !entry.is_expired(now))
    }

    /// Returns the live entry for `key` mutably.
    pub fn live_mut(&mut self, key: &str, now: DateTime<Utc>) -> Option<&mut StoreEntry> {
        self.entries
            .get_mut(key)
            .filter(|entry| !entry.is_expired(now))
    }

    /// Inserts or replaces the entry for `key`.
    pub fn insert(&mut self, key: &str, entry: StoreEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    /// Removes `key`, live or expired.
    pub fn remove(&mut self, key: &str) -> Option<StoreEntry> {
        self.entries.remove(key)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    /// Number of entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = StoreEntry::new("v".into(), None, at(100));

        assert_eq!(entry.value, CacheValue::from("v"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired(at(i32::MAX as i64)));
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let entry = StoreEntry::new("v".into(), Some(0), at(100));
        assert!(entry.expires_at.is_none());
        assert!(entry.ttl_remaining(at(100)).is_none());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoreEntry::new("v".into(), Some(10), at(100));

        assert!(!entry.is_expired(at(109)));
        assert!(entry.is_expired(at(110)));
        assert!(entry.is_expired(at(111)));
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let entry = StoreEntry::new("v".into(), Some(-1), at(100));
        assert!(entry.is_expired(at(100)));
    }

    #[test]
    fn test_out_of_range_ttl_clamps() {
        let entry = StoreEntry::new("v".into(), Some(i64::MAX), at(100));
        assert_eq!(entry.expires_at, Some(DateTime::<Utc>::MAX_UTC));

        let entry = StoreEntry::new("v".into(), Some(i64::MIN), at(100));
        assert!(entry.is_expired(at(100)));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = StoreEntry::new("v".into(), Some(10), at(100));

        assert_eq!(entry.ttl_remaining(at(100)), Some(10));
        assert_eq!(entry.ttl_remaining(at(104)), Some(6));
        assert_eq!(entry.ttl_remaining(at(200)), Some(0));
    }

    #[test]
    fn test_table_hides_and_purges_expired() {
        let mut table = EntryTable::default();
        table.insert("short", StoreEntry::new("a".into(), Some(1), at(100)));
        table.insert("long", StoreEntry::new("b".into(), Some(60), at(100)));

        assert!(table.live("short", at(100)).is_some());
        assert!(table.live("short", at(101)).is_none());

        assert_eq!(table.purge_expired(at(101)), 1);
        assert_eq!(table.len(), 1);
        assert!(table.live("long", at(101)).is_some());
    }

    #[test]
    fn test_entry_serializes_timestamps() {
        let entry = StoreEntry::new(0.into(), Some(60), at(0));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["value"], 0);
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
        assert_eq!(json["expires_at"], "1970-01-01T00:01:00Z");
    }
}
