//! Binary-Safe Store Decorator
//!
//! Wraps a store so raw byte payloads survive backends that only keep text.
//! Non-ASCII `Bytes` are base64-encoded and stored inside a one-entry map
//! under a sub-key derived from the cache key; reads reverse this.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::store::Store;
use crate::value::CacheValue;

const SUBKEY_PREFIX: &str = "ttl_cache::BinarySafe";

// == Binary Safe ==
/// Decorator adding binary safety to any [`Store`].
#[derive(Debug, Default, Clone)]
pub struct BinarySafe<S> {
    inner: S,
}

impl<S: Store> BinarySafe<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The wrapped store; values read here are still encoded.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Mutable access to the wrapped store, bypassing encoding.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwraps the decorator.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Wrapper sub-key for `key`: hex SHA-256 of a fixed prefix plus the key.
    pub fn subkey(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(SUBKEY_PREFIX.as_bytes());
        hasher.update(key.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn encode(key: &str, value: CacheValue) -> CacheValue {
        match value {
            CacheValue::Bytes(bytes) if !bytes.is_ascii() => {
                let mut wrapper = BTreeMap::new();
                wrapper.insert(Self::subkey(key), CacheValue::Text(STANDARD.encode(bytes)));
                CacheValue::Map(wrapper)
            }
            other => other,
        }
    }

    fn decode(key: &str, value: CacheValue) -> CacheValue {
        let CacheValue::Map(wrapper) = &value else {
            return value;
        };
        if wrapper.len() != 1 {
            return value;
        }

        let decoded = wrapper
            .get(&Self::subkey(key))
            .and_then(CacheValue::as_str)
            .and_then(|encoded| STANDARD.decode(encoded).ok());

        match decoded {
            Some(bytes) => CacheValue::Bytes(bytes),
            // Not one of ours, hand it back untouched
            None => value,
        }
    }
}

impl<S: Store> Store for BinarySafe<S> {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        Ok(self.inner.get(key)?.map(|value| Self::decode(key, value)))
    }

    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        self.inner.set(key, Self::encode(key, value), ttl)
    }

    fn update(&mut self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<bool> {
        self.inner.update(key, Self::encode(key, value), ttl)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        self.inner.delete(key)
    }

    fn clear(&mut self) -> Option<bool> {
        self.inner.clear()
    }

    fn get_multiple(
        &self,
        keys: &[&str],
        default: Option<CacheValue>,
    ) -> Result<Vec<(String, Option<CacheValue>)>> {
        let values = self.inner.get_multiple(keys, None)?;
        Ok(values
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Some(value) => Some(Self::decode(&key, value)),
                    None => default.clone(),
                };
                (key, value)
            })
            .collect())
    }

    fn set_multiple(&mut self, values: Vec<(String, CacheValue)>, ttl: Option<i64>) -> Result<bool> {
        let encoded = values
            .into_iter()
            .map(|(key, value)| {
                let value = Self::encode(&key, value);
                (key, value)
            })
            .collect();
        self.inner.set_multiple(encoded, ttl)
    }

    fn delete_multiple(&mut self, keys: &[&str]) -> Result<bool> {
        self.inner.delete_multiple(keys)
    }
}
