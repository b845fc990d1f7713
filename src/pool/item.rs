//! Cache Item Module
//!
//! One key's value in flight between the application and a store, with the
//! expiration policy that decides whether it is still a hit.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::expiration::{Expiration, Ttl};
use crate::store::Store;
use crate::value::CacheValue;

// == Cache Item ==
/// A retrieved or pending cache value.
///
/// Hit state is re-evaluated on every call: an item hydrated as a hit stops
/// being one as soon as its expiration lapses.
#[derive(Debug, Clone)]
pub struct CacheItem {
    key: String,
    value: Option<CacheValue>,
    /// Populated from the store or explicitly `set`
    stored: bool,
    expiration: Expiration,
}

impl CacheItem {
    // == Constructors ==
    /// Creates an empty miss for `key`.
    pub fn new(key: impl Into<String>, expiration: Expiration) -> Self {
        Self {
            key: key.into(),
            value: None,
            stored: false,
            expiration,
        }
    }

    /// Creates an item populated from whatever `store` currently holds.
    ///
    /// Any stored value counts as present, including `0`, `false` and `Null`.
    pub fn hydrate<S: Store + ?Sized>(
        key: impl Into<String>,
        store: &S,
        expiration: Expiration,
    ) -> Result<Self> {
        let key = key.into();
        let value = store.get(&key)?;

        Ok(Self {
            stored: value.is_some(),
            key,
            value,
            expiration,
        })
    }

    /// The key this item was built for.
    pub fn key(&self) -> &str {
        &self.key
    }

    // == Read ==
    /// The value, only while the item is a hit.
    pub fn get(&self) -> Option<&CacheValue> {
        if self.is_hit() {
            self.value.as_ref()
        } else {
            None
        }
    }

    /// True if the item holds a value and its expiration is still valid.
    pub fn is_hit(&self) -> bool {
        self.stored && self.expiration.is_valid()
    }

    /// The policy deciding whether this item is still a hit.
    pub fn expiration(&self) -> &Expiration {
        &self.expiration
    }

    // == Fluent Mutators ==
    /// Sets the value and marks it as present.
    pub fn set(&mut self, value: impl Into<CacheValue>) -> &mut Self {
        self.value = Some(value.into());
        self.stored = true;
        self
    }

    /// Sets an absolute expiration; `None` resets to the default horizon.
    pub fn expires_at(&mut self, at: Option<DateTime<Utc>>) -> &mut Self {
        self.expiration.expires_at(at);
        self
    }

    /// Sets a relative expiration. See [`Expiration::expires_after`].
    pub fn expires_after(&mut self, ttl: impl Into<Ttl>) -> Result<&mut Self> {
        self.expiration.expires_after(ttl)?;
        Ok(self)
    }

    /// Value to persist, or `None` for an item that was never set.
    pub(crate) fn value_for_write(&self) -> Option<CacheValue> {
        self.value.clone()
    }
}
