//! Store-Backed Simple Cache
//!
//! Writes straight to a [`Store`], remembering which keys it wrote so that
//! `clear` can sweep them on backends with no bulk invalidation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::Result;
use crate::expiration::{Expiration, Ttl};
use crate::key::validate_key;
use crate::simple::SimpleCache;
use crate::store::Store;
use crate::value::CacheValue;

// == Store Cache ==
/// [`SimpleCache`] over a raw [`Store`].
#[derive(Debug)]
pub struct StoreCache<S: Store> {
    store: S,
    /// Measures TTLs passed to `set`
    clock: Arc<dyn Clock>,
    /// Keys written through this instance and not yet deleted
    used_keys: HashSet<String>,
}

impl<S: Store> StoreCache<S> {
    /// Creates a cache over `store`, measuring TTLs against `clock`.
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            used_keys: HashSet::new(),
        }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store; writes made here are not tracked.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Unwraps the store, dropping the tracked keys.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Keys `clear` would sweep.
    pub fn used_keys(&self) -> impl Iterator<Item = &str> {
        self.used_keys.iter().map(String::as_str)
    }

    /// Deletes tracked keys one by one. Keys whose delete fails stay
    /// tracked so a later `clear` can retry them.
    fn sweep_used_keys(&mut self) -> bool {
        let keys: Vec<String> = self.used_keys.iter().cloned().collect();
        let mut success = true;

        for key in keys {
            match self.store.delete(&key) {
                Ok(true) => {
                    self.used_keys.remove(&key);
                }
                Ok(false) => {
                    warn!(key = %key, "store refused delete during clear");
                    success = false;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "store delete failed during clear");
                    success = false;
                }
            }
        }

        success
    }
}

impl<S: Store> SimpleCache for StoreCache<S> {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        validate_key(key)?;
        let value = self.store.get(key)?;
        debug!(key, hit = value.is_some(), "simple cache get");
        Ok(value)
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Ttl) -> Result<bool> {
        validate_key(key)?;
        let ttl = Expiration::ttl_in_seconds(&self.clock, ttl)?;

        let written = self.store.set(key, value, Some(ttl))?;
        self.used_keys.insert(key.to_string());
        if !written {
            warn!(key, ttl, "store refused write");
        }
        Ok(written)
    }

    /// Forgets `key` only once the store confirms the delete, so a refused
    /// delete is retried by the next `clear`.
    fn delete(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let deleted = self.store.delete(key)?;
        if deleted {
            self.used_keys.remove(key);
        } else {
            warn!(key, "store refused delete");
        }
        Ok(deleted)
    }

    /// Uses the store's bulk clear when it has one, trusting its result and
    /// forgetting every tracked key. Otherwise sweeps the tracked keys and
    /// reports `false` if any delete failed.
    fn clear(&mut self) -> Result<bool> {
        if let Some(cleared) = self.store.clear() {
            debug!(cleared, "store bulk clear");
            self.used_keys.clear();
            return Ok(cleared);
        }

        let tracked = self.used_keys.len();
        let success = self.sweep_used_keys();
        debug!(tracked, remaining = self.used_keys.len(), "swept used keys");
        Ok(success)
    }
}
