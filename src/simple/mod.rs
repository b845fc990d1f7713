//! Simple Cache Module
//!
//! Key-value facade with per-call TTLs, backed either directly by a
//! [`Store`](crate::store::Store) or by an [`ItemPool`](crate::pool::ItemPool).
//!
//! # Bulk operations
//! `*_multiple` validate every key before touching the backend, then apply
//! the single-key operation to each element, carrying on past failures. The
//! returned flag is the AND of the individual results.

mod pool_cache;
mod store_cache;

pub use pool_cache::PoolCache;
pub use store_cache::StoreCache;

use crate::error::Result;
use crate::expiration::Ttl;
use crate::key::validate_keys;
use crate::value::CacheValue;

// == Simple Cache Trait ==
/// A get/set/delete cache.
///
/// A stored value is a hit whatever it holds: `0`, `false`, `""` and `Null`
/// are all returned as values, never treated as misses.
pub trait SimpleCache {
    /// Returns the value for `key`, or `None` on a miss.
    fn get(&self, key: &str) -> Result<Option<CacheValue>>;

    /// Writes `value` under `key` for `ttl`.
    ///
    /// `Ttl::Default` keeps the value for one year; a zero or negative TTL
    /// stores it already expired.
    fn set(&mut self, key: &str, value: CacheValue, ttl: Ttl) -> Result<bool>;

    /// Removes `key`.
    fn delete(&mut self, key: &str) -> Result<bool>;

    /// Removes everything this cache has written.
    fn clear(&mut self) -> Result<bool>;

    /// Returns the value for `key`, or `default` on a miss.
    fn get_or(&self, key: &str, default: CacheValue) -> Result<CacheValue> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// True if `key` is a hit.
    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    // == Bulk ==
    /// Looks up every key, substituting `default` for misses.
    ///
    /// # Returns
    /// `(key, value)` pairs in input order.
    fn get_multiple<I>(
        &self,
        keys: I,
        default: Option<CacheValue>,
    ) -> Result<Vec<(String, Option<CacheValue>)>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keys = validate_keys(keys)?;
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let value = self.get(&key)?.or_else(|| default.clone());
            values.push((key, value));
        }
        Ok(values)
    }

    /// Writes every `(key, value)` pair with the same `ttl`.
    fn set_multiple<I, K, V>(&mut self, values: I, ttl: impl Into<Ttl>) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<CacheValue>,
    {
        let (keys, values): (Vec<K>, Vec<V>) = values.into_iter().unzip();
        let keys = validate_keys(keys)?;
        let ttl = ttl.into();

        let mut success = true;
        for (key, value) in keys.iter().zip(values) {
            success &= self.set(key, value.into(), ttl)?;
        }
        Ok(success)
    }

    /// Removes every key.
    fn delete_multiple<I>(&mut self, keys: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut success = true;
        for key in validate_keys(keys)? {
            success &= self.delete(&key)?;
        }
        Ok(success)
    }
}
