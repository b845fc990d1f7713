//! Option Store Module
//!
//! Persistent named options: values never expire and `set` only adds.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::store::Store;
use crate::value::CacheValue;

// == Option Store ==
/// In-process option table.
///
/// TTL arguments are ignored. `set` adds a missing option and refuses to
/// overwrite an existing one; `update` writes unconditionally.
#[derive(Debug, Default, Clone)]
pub struct OptionStore {
    options: BTreeMap<String, CacheValue>,
}

impl OptionStore {
    /// Creates an empty option table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all stored options, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Number of stored options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// True if no option is stored.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Store for OptionStore {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        Ok(self.options.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: CacheValue, _ttl: Option<i64>) -> Result<bool> {
        if self.options.contains_key(key) {
            return Ok(false);
        }
        self.options.insert(key.to_string(), value);
        Ok(true)
    }

    fn update(&mut self, key: &str, value: CacheValue, _ttl: Option<i64>) -> Result<bool> {
        self.options.insert(key.to_string(), value);
        Ok(true)
    }

    /// Reports whether an option was actually removed.
    fn delete(&mut self, key: &str) -> Result<bool> {
        Ok(self.options.remove(key).is_some())
    }
}
