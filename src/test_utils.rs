//! Shared helpers for unit tests.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::ManualClock;
use crate::error::Result;
use crate::store::{ObjectStore, Store};
use crate::value::CacheValue;

/// 2021-01-01T00:00:00Z, start of a non-leap year.
pub const TEST_NOW: i64 = 1_609_459_200;

/// Installs a test-writer subscriber honoring `RUST_LOG`; repeated calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// A frozen clock at [`TEST_NOW`].
pub fn test_clock() -> ManualClock {
    ManualClock::at_timestamp(TEST_NOW)
}

// == Shared Store ==
/// Store handle whose clones see the same object store, so a test can keep
/// looking at the backend after handing a clone to a pool.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<ObjectStore>>,
}

impl SharedStore {
    /// Creates an empty shared object store on `clock`.
    pub fn new(clock: &ManualClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObjectStore::new(Arc::new(clock.clone())))),
        }
    }

    /// Reads the backend directly.
    pub fn peek(&self, key: &str) -> Option<CacheValue> {
        self.inner.lock().get(key).ok().flatten()
    }
}

impl Store for SharedStore {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.inner.lock().get(key)
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        self.inner.lock().set(key, value, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        self.inner.lock().delete(key)
    }

    fn clear(&mut self) -> Option<bool> {
        self.inner.lock().clear()
    }
}

// == Flaky Store ==
/// Object store that refuses writes and deletes for chosen keys.
#[derive(Debug)]
pub struct FlakyStore {
    pub inner: ObjectStore,
    pub refuse_writes: HashSet<String>,
    pub refuse_deletes: HashSet<String>,
    pub bulk_clear: Option<bool>,
}

impl FlakyStore {
    /// Creates a store that accepts everything until told otherwise.
    pub fn new(clock: &ManualClock) -> Self {
        Self {
            inner: ObjectStore::new(Arc::new(clock.clone())),
            refuse_writes: HashSet::new(),
            refuse_deletes: HashSet::new(),
            bulk_clear: None,
        }
    }

    /// Refuses every write to `key`.
    pub fn refuse_write(mut self, key: &str) -> Self {
        self.refuse_writes.insert(key.to_string());
        self
    }

    /// Refuses every delete of `key`.
    pub fn refuse_delete(mut self, key: &str) -> Self {
        self.refuse_deletes.insert(key.to_string());
        self
    }
}

impl Store for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        if self.refuse_writes.contains(key) {
            return Ok(false);
        }
        self.inner.set(key, value, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        if self.refuse_deletes.contains(key) {
            return Ok(false);
        }
        self.inner.delete(key)
    }

    fn clear(&mut self) -> Option<bool> {
        let result = self.bulk_clear?;
        if result {
            self.inner.clear();
        }
        Some(result)
    }
}
