//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.
//!
//! Every variant belongs to the "invalid argument" family: they are raised
//! synchronously before any store I/O. Store-level soft failures are never
//! errors, they surface as `Ok(false)`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty, too long for the backing store, or contains a reserved character
    #[error("Invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// TTL cannot be resolved to an instant (out of the representable range)
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Any other malformed argument (interval syntax, bulk input, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CacheError {
    /// Builds an `InvalidKey` error.
    pub fn invalid_key(key: &str, reason: impl Into<String>) -> Self {
        CacheError::InvalidKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// True for every variant; callers matching on the argument-error class
    /// don't need to enumerate variants.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            CacheError::InvalidKey { .. }
                | CacheError::InvalidTtl(_)
                | CacheError::InvalidArgument(_)
        )
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
