//! Pool-Backed Simple Cache
//!
//! Bridges the simple-cache contract onto an [`ItemPool`]: every call
//! becomes an item lookup or an immediate `save`.

use tracing::debug;

use crate::error::Result;
use crate::expiration::Ttl;
use crate::pool::ItemPool;
use crate::simple::SimpleCache;
use crate::store::Store;
use crate::value::CacheValue;

// == Pool Cache ==
/// [`SimpleCache`] over an [`ItemPool`].
///
/// The pool's saved shadow doubles as the set of used keys, so `clear`
/// removes exactly what was written through this cache.
pub struct PoolCache<S: Store> {
    pool: ItemPool<S>,
}

impl<S: Store> PoolCache<S> {
    /// Wraps `pool`.
    pub fn new(pool: ItemPool<S>) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &ItemPool<S> {
        &self.pool
    }

    /// Mutable access to the underlying pool.
    pub fn pool_mut(&mut self) -> &mut ItemPool<S> {
        &mut self.pool
    }
}

impl<S: Store> SimpleCache for PoolCache<S> {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        let item = self.pool.get_item(key)?;
        Ok(item.get().cloned())
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Ttl) -> Result<bool> {
        let mut item = self.pool.get_item(key)?;
        item.set(value).expires_after(ttl)?;
        self.pool.save(item)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        self.pool.delete_item(key)
    }

    fn clear(&mut self) -> Result<bool> {
        debug!("clearing pool-backed cache");
        Ok(self.pool.clear())
    }

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.pool.get_item(key)?.is_hit())
    }
}
