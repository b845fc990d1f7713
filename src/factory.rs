//! Factory Module
//!
//! Assembles stores, pools and simple-cache facades from a [`CacheConfig`].

use std::sync::Arc;

use tracing::info;

use crate::clock::{system_clock, Clock};
use crate::config::{Backend, CacheConfig};
use crate::expiration::Expiration;
use crate::pool::ItemPool;
use crate::simple::{PoolCache, StoreCache};
use crate::store::{BinarySafe, ObjectStore, OptionStore, Store, TransientStore};

/// Store type every factory product is built over.
pub type DynStore = Box<dyn Store>;

// == Factory ==
/// Builds cache components sharing one configuration and clock.
#[derive(Debug, Clone)]
pub struct Factory {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl Factory {
    /// Creates a factory using the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    /// Creates a factory configured from the environment.
    /// See [`CacheConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(CacheConfig::from_env())
    }

    /// Creates a factory measuring every TTL against `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// The configuration products are built from.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Products ==
    /// Builds the configured store adapter, wrapped in [`BinarySafe`] when
    /// enabled.
    pub fn make_store(&self) -> DynStore {
        let clock = Arc::clone(&self.clock);
        let store: DynStore = match self.config.backend {
            Backend::Object if self.config.collect_stats => Box::new(ObjectStore::new(clock)),
            Backend::Object => Box::new(ObjectStore::without_stats(clock)),
            Backend::Transient => Box::new(TransientStore::with_max_key_length(
                clock,
                self.config.max_key_length,
            )),
            Backend::Option => Box::new(OptionStore::new()),
        };

        info!(
            backend = %self.config.backend,
            binary_safe = self.config.binary_safe,
            "cache store initialized"
        );

        if self.config.binary_safe {
            Box::new(BinarySafe::new(store))
        } else {
            store
        }
    }

    /// Builds an item pool over a new store.
    pub fn make_pool(&self) -> ItemPool<DynStore> {
        ItemPool::new(self.make_store(), Expiration::new(Arc::clone(&self.clock)))
    }

    /// Builds a simple cache writing straight to a new store.
    pub fn make_simple_cache(&self) -> StoreCache<DynStore> {
        StoreCache::new(self.make_store(), Arc::clone(&self.clock))
    }

    /// Builds a simple cache on top of a new item pool.
    pub fn make_pool_cache(&self) -> PoolCache<DynStore> {
        PoolCache::new(self.make_pool())
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
