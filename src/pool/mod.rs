//! Item Pool Module
//!
//! Orchestrates cache items against one backing store: read-through over
//! in-memory shadow maps, deferred write batching, deletion and clearing.

mod item;


use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::expiration::Expiration;
use crate::key::{validate_key, validate_keys};
use crate::store::Store;

pub use item::CacheItem;

// == Item Pool ==
/// A pool of cache items over a [`Store`].
///
/// `saved` shadows what this pool has written through; `deferred` holds
/// items queued by `save_deferred` until the next `commit`. Reads check
/// `deferred` first, then `saved`, then the store. Dropping the pool commits
/// whatever is still deferred.
///
/// The shadow maps are unsynchronized; share a pool across threads only
/// behind a lock.
pub struct ItemPool<S: Store> {
    /// Backing store
    store: S,
    /// Prototype cloned into every item built from the store
    expiration: Expiration,
    /// Items confirmed written through
    saved: HashMap<String, CacheItem>,
    /// Items queued for the next commit
    deferred: HashMap<String, CacheItem>,
}

impl<S: Store> ItemPool<S> {
    // == Constructor ==
    /// Creates a pool over `store`.
    ///
    /// # Arguments
    /// * `store` - Backing store
    /// * `expiration` - Prototype expiration; every item built from the store
    ///   starts with a clone of it
    pub fn new(store: S, expiration: Expiration) -> Self {
        Self {
            store,
            expiration,
            saved: HashMap::new(),
            deferred: HashMap::new(),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store; bypasses the shadow maps.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Number of items waiting for `commit`.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    // == Get Item ==
    /// Returns the item for `key`.
    ///
    /// Lookup order: a deferred hit, a saved hit, then a fresh item hydrated
    /// from the store. Returned items are copies; mutating one has no effect
    /// until it is saved.
    pub fn get_item(&self, key: &str) -> Result<CacheItem> {
        validate_key(key)?;

        if let Some(item) = self.deferred.get(key).filter(|item| item.is_hit()) {
            debug!(key, "deferred hit");
            return Ok(item.clone());
        }

        if let Some(item) = self.saved.get(key).filter(|item| item.is_hit()) {
            debug!(key, "saved hit");
            return Ok(item.clone());
        }

        let item = CacheItem::hydrate(key, &self.store, self.expiration.clone())?;
        debug!(key, hit = item.is_hit(), "hydrated from store");
        Ok(item)
    }

    // == Get Items ==
    /// Lazily yields `(key, item)` for each key.
    ///
    /// Keys are validated as they are reached; an invalid key yields an
    /// error in its position.
    pub fn get_items<'a, I>(&'a self, keys: I) -> impl Iterator<Item = Result<(String, CacheItem)>> + 'a
    where
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
        I::Item: AsRef<str>,
    {
        keys.into_iter().map(move |key| {
            let key = key.as_ref();
            self.get_item(key).map(|item| (key.to_string(), item))
        })
    }

    // == Has Item ==
    /// True if `key` is a deferred hit or a saved hit.
    pub fn has_item(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        let hit = |map: &HashMap<String, CacheItem>| map.get(key).is_some_and(CacheItem::is_hit);
        Ok(hit(&self.deferred) || hit(&self.saved))
    }

    // == Save Deferred ==
    /// Queues `item` for the next commit. Touches no storage.
    pub fn save_deferred(&mut self, item: CacheItem) -> Result<bool> {
        validate_key(item.key())?;
        self.deferred.insert(item.key().to_string(), item);
        Ok(true)
    }

    // == Save ==
    /// Writes `item` through immediately, superseding any deferred item
    /// with the same key.
    ///
    /// An item that was never `set` is not written and returns `false`.
    ///
    /// # Errors
    /// Whatever the store raises for the write; the key's saved shadow is
    /// dropped first.
    pub fn save(&mut self, item: CacheItem) -> Result<bool> {
        validate_key(item.key())?;
        self.deferred.remove(item.key());
        self.write(item)
    }

    // == Commit ==
    /// Writes every deferred item through.
    ///
    /// Items that were written move to `saved`; failed ones are dropped.
    /// Store errors are logged and count as failed writes.
    ///
    /// # Returns
    /// `true` if every write succeeded (trivially so with nothing deferred).
    pub fn commit(&mut self) -> bool {
        if self.deferred.is_empty() {
            return true;
        }

        let items: Vec<CacheItem> = self.deferred.drain().map(|(_, item)| item).collect();
        let total = items.len();
        let mut written = 0;
        for item in items {
            let key = item.key().to_string();
            match self.write(item) {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => warn!(key = %key, error = %e, "store write failed during commit"),
            }
        }

        debug!(total, written, "committed deferred items");
        written == total
    }

    // == Delete ==
    /// Deletes a single key. See [`ItemPool::delete_items`].
    pub fn delete_item(&mut self, key: &str) -> Result<bool> {
        self.delete_items([key])
    }

    /// Deletes every key.
    ///
    /// All keys are validated before anything is removed. A key that was only
    /// deferred is dropped without touching the store; any other key is
    /// deleted from the store and leaves the saved shadow on success.
    ///
    /// # Returns
    /// `true` if every store delete succeeded.
    pub fn delete_items<I>(&mut self, keys: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keys = validate_keys(keys)?;
        let mut success = true;

        for key in keys {
            if self.deferred.remove(&key).is_some() && !self.saved.contains_key(&key) {
                continue;
            }

            match self.store.delete(&key) {
                Ok(true) => {
                    self.saved.remove(&key);
                }
                Ok(false) => {
                    warn!(key = %key, "store refused delete");
                    success = false;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "store delete failed");
                    success = false;
                }
            }
        }

        Ok(success)
    }

    // == Clear ==
    /// Deletes every saved key from the store and forgets all shadow state.
    ///
    /// Always returns `true`: the shadow maps are emptied even when a store
    /// delete fails, so no stale hit survives a clear.
    pub fn clear(&mut self) -> bool {
        let keys: Vec<String> = self.saved.keys().cloned().collect();
        for key in keys {
            match self.store.delete(&key) {
                Ok(true) => {}
                Ok(false) => warn!(key = %key, "store refused delete during clear"),
                Err(e) => warn!(key = %key, error = %e, "store delete failed during clear"),
            }
        }

        self.saved.clear();
        self.deferred.clear();
        true
    }

    /// Writes one item through with its remaining lifetime as TTL.
    fn write(&mut self, item: CacheItem) -> Result<bool> {
        let key = item.key().to_string();
        let Some(value) = item.value_for_write() else {
            debug!(key = %key, "item was never set, nothing to write");
            return Ok(false);
        };
        let ttl = item.expiration().store_ttl();

        match self.store.set(&key, value, Some(ttl)) {
            Ok(true) => {
                self.saved.insert(key, item);
                Ok(true)
            }
            Ok(false) => {
                warn!(key = %key, ttl, "store refused write");
                self.saved.remove(&key);
                Ok(false)
            }
            Err(e) => {
                self.saved.remove(&key);
                Err(e)
            }
        }
    }
}

impl<S: Store> Drop for ItemPool<S> {
    fn drop(&mut self) {
        let pending = self.deferred.len();
        if pending > 0 && !self.commit() {
            warn!(pending, "some deferred items were lost when the pool was dropped");
        }
    }
}
