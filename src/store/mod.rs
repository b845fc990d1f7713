//! Store Module
//!
//! The narrow key-value interface the pool and facades consume, plus
//! in-process adapters emulating the host platform's caching primitives.
//!
//! # Adapters
//! - [`ObjectStore`] - process-local object cache with TTL, bulk clear and counters
//! - [`TransientStore`] - TTL store with a key length limit
//! - [`OptionStore`] - persistent options, TTL ignored, add-only `set`
//! - [`BinarySafe`] - decorator making raw byte payloads safe for text-only backends

mod binary;
mod entry;
mod object;
mod option;
mod stats;
mod transient;

pub use binary::BinarySafe;
pub use entry::StoreEntry;
pub use object::ObjectStore;
pub use option::OptionStore;
pub use stats::CacheStats;
pub use transient::{TransientStore, DEFAULT_MAX_KEY_LENGTH};

use crate::error::Result;
use crate::value::CacheValue;

// == Store Trait ==
/// Minimal key-value contract the cache layer is built on.
///
/// Validation problems (a key the backend cannot accept) are errors; a write
/// or delete the backend refuses is `Ok(false)`.
pub trait Store {
    /// Returns the stored value, or `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<CacheValue>>;

    /// Returns the stored value, or `default` when absent or expired.
    fn get_or(&self, key: &str, default: CacheValue) -> Result<CacheValue> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Writes `value` under `key`.
    ///
    /// `ttl` is in seconds; how `None`, zero and negative values are treated
    /// is up to the backend.
    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool>;

    /// Like `set`, but some backends require the key to exist already.
    fn update(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        self.set(key, value, ttl)
    }

    /// Removes `key`.
    fn delete(&mut self, key: &str) -> Result<bool>;

    /// Bulk invalidation, `None` when the backend has no such capability.
    fn clear(&mut self) -> Option<bool> {
        None
    }

    // == Bulk ==
    /// Looks up every key, substituting `default` for misses.
    ///
    /// # Returns
    /// `(key, value)` pairs in input order.
    fn get_multiple(
        &self,
        keys: &[&str],
        default: Option<CacheValue>,
    ) -> Result<Vec<(String, Option<CacheValue>)>> {
        let mut values = Vec::with_capacity(keys.len());
        for &key in keys {
            let value = self.get(key)?.or_else(|| default.clone());
            values.push((key.to_string(), value));
        }
        Ok(values)
    }

    /// Writes every pair with the same `ttl`, carrying on past refused
    /// writes. Returns `true` only if every write was accepted.
    fn set_multiple(&mut self, values: Vec<(String, CacheValue)>, ttl: Option<i64>) -> Result<bool> {
        let mut success = true;
        for (key, value) in values {
            success &= self.set(&key, value, ttl)?;
        }
        Ok(success)
    }

    /// Removes every key, carrying on past refused deletes. Returns `true`
    /// only if every delete succeeded.
    fn delete_multiple(&mut self, keys: &[&str]) -> Result<bool> {
        let mut success = true;
        for &key in keys {
            success &= self.delete(key)?;
        }
        Ok(success)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        (**self).set(key, value, ttl)
    }

    fn update(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        (**self).update(key, value, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn clear(&mut self) -> Option<bool> {
        (**self).clear()
    }

    fn get_multiple(
        &self,
        keys: &[&str],
        default: Option<CacheValue>,
    ) -> Result<Vec<(String, Option<CacheValue>)>> {
        (**self).get_multiple(keys, default)
    }

    fn set_multiple(&mut self, values: Vec<(String, CacheValue)>, ttl: Option<i64>) -> Result<bool> {
        (**self).set_multiple(values, ttl)
    }

    fn delete_multiple(&mut self, keys: &[&str]) -> Result<bool> {
        (**self).delete_multiple(keys)
    }
}
