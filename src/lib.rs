//! TTL Cache - Item pools and simple caches over pluggable key-value stores
//!
//! Provides an expiration model measured against an injectable clock, a
//! cache item pool with deferred write batching, a get/set simple-cache
//! facade, and in-process store adapters with a binary-safe decorator.

pub mod clock;
pub mod config;
pub mod error;
pub mod expiration;
pub mod factory;
pub mod key;
pub mod pool;
pub mod simple;
pub mod store;
pub mod value;

#[cfg(test)]
pub(crate) mod test_utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Backend, CacheConfig};
pub use error::{CacheError, Result};
pub use expiration::{Expiration, Interval, Ttl, YEAR_IN_SECONDS};
pub use factory::Factory;
pub use pool::{CacheItem, ItemPool};
pub use simple::{PoolCache, SimpleCache, StoreCache};
pub use store::{BinarySafe, ObjectStore, OptionStore, Store, TransientStore};
pub use value::CacheValue;
