//! Transient Store Module
//!
//! TTL store with a backend key length limit and no bulk clear.

use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::error::{CacheError, Result};
use crate::store::entry::{EntryTable, StoreEntry};
use crate::store::Store;
use crate::value::CacheValue;

/// Longest key the transient backend accepts, in bytes.
pub const DEFAULT_MAX_KEY_LENGTH: usize = 180;

// == Transient Store ==
/// In-process transient storage.
///
/// `None` or `0` TTL stores a value without expiration; a negative TTL stores
/// one that is already expired. Keys longer than the configured limit are
/// rejected before touching storage.
#[derive(Debug)]
pub struct TransientStore {
    entries: EntryTable,
    clock: Arc<dyn Clock>,
    max_key_length: usize,
}

impl TransientStore {
    /// Creates a store with the default key length limit.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_max_key_length(clock, DEFAULT_MAX_KEY_LENGTH)
    }

    /// Creates a store rejecting keys longer than `max_key_length` bytes.
    pub fn with_max_key_length(clock: Arc<dyn Clock>, max_key_length: usize) -> Self {
        Self {
            entries: EntryTable::default(),
            clock,
            max_key_length,
        }
    }

    /// Remaining lifetime of `key` in seconds; `None` if absent, expired, or
    /// stored without expiration.
    pub fn ttl_remaining(&self, key: &str) -> Option<i64> {
        let now = self.clock.now();
        self.entries
            .live(key, now)
            .and_then(|entry| entry.ttl_remaining(now))
    }

    // == Purge Expired ==
    /// Garbage-collects expired transients, returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let removed = self.entries.purge_expired(self.clock.now());
        if removed > 0 {
            debug!(removed, "transient store purged expired entries");
        }
        removed
    }

    /// Number of transients held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no transient is held.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    fn assert_key_length(&self, key: &str) -> Result<()> {
        if key.len() > self.max_key_length {
            return Err(CacheError::invalid_key(
                key,
                format!("maximum key length is {} bytes", self.max_key_length),
            ));
        }
        Ok(())
    }
}

impl Store for TransientStore {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.assert_key_length(key)?;
        Ok(self
            .entries
            .live(key, self.clock.now())
            .map(|entry| entry.value.clone()))
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        self.assert_key_length(key)?;
        self.entries
            .insert(key, StoreEntry::new(value, ttl, self.clock.now()));
        Ok(true)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        self.assert_key_length(key)?;
        self.entries.remove(key);
        Ok(true)
    }
}
