//! Configuration Module
//!
//! Handles loading and managing cache construction settings from environment
//! variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;
use crate::store::DEFAULT_MAX_KEY_LENGTH;

// == Backend ==
/// Which store adapter the factory builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Process-local object cache with bulk clear
    #[default]
    Object,
    /// TTL store with a key length limit
    Transient,
    /// Persistent options, TTL ignored
    Option,
}

impl FromStr for Backend {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "object" => Ok(Backend::Object),
            "transient" => Ok(Backend::Transient),
            "option" => Ok(Backend::Option),
            other => Err(CacheError::InvalidArgument(format!(
                "unknown cache backend {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Object => "object",
            Backend::Transient => "transient",
            Backend::Option => "option",
        };
        f.write_str(name)
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Store adapter to build
    pub backend: Backend,
    /// Wrap the store so raw bytes survive text-only backends
    pub binary_safe: bool,
    /// Longest key the transient backend accepts
    pub max_key_length: usize,
    /// Record hit/miss counters in the object store
    pub collect_stats: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `object`, `transient` or `option` (default: object)
    /// - `CACHE_BINARY_SAFE` - Wrap the store in the binary-safe decorator (default: true)
    /// - `CACHE_MAX_KEY_LENGTH` - Transient key length limit in bytes (default: 180)
    /// - `CACHE_COLLECT_STATS` - Object store hit/miss counters (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: parse_env("CACHE_BACKEND").unwrap_or(defaults.backend),
            binary_safe: parse_env("CACHE_BINARY_SAFE").unwrap_or(defaults.binary_safe),
            max_key_length: parse_env("CACHE_MAX_KEY_LENGTH").unwrap_or(defaults.max_key_length),
            collect_stats: parse_env("CACHE_COLLECT_STATS").unwrap_or(defaults.collect_stats),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Object,
            binary_safe: true,
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            collect_stats: true,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, Backend::Object);
        assert!(config.binary_safe);
        assert_eq!(config.max_key_length, 180);
        assert!(config.collect_stats);
    }

    #[test]
    fn test_config_from_env() {
        // Only test that mutates these variables
        env::remove_var("CACHE_BACKEND");
        env::remove_var("CACHE_BINARY_SAFE");
        env::remove_var("CACHE_MAX_KEY_LENGTH");
        env::remove_var("CACHE_COLLECT_STATS");
        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::set_var("CACHE_BACKEND", "Transient");
        env::set_var("CACHE_BINARY_SAFE", "false");
        env::set_var("CACHE_MAX_KEY_LENGTH", "64");
        env::set_var("CACHE_COLLECT_STATS", "not-a-bool");

        let config = CacheConfig::from_env();
        assert_eq!(config.backend, Backend::Transient);
        assert!(!config.binary_safe);
        assert_eq!(config.max_key_length, 64);
        assert!(config.collect_stats);

        env::remove_var("CACHE_BACKEND");
        env::remove_var("CACHE_BINARY_SAFE");
        env::remove_var("CACHE_MAX_KEY_LENGTH");
        env::remove_var("CACHE_COLLECT_STATS");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("object".parse::<Backend>().unwrap(), Backend::Object);
        assert_eq!(" OPTION ".parse::<Backend>().unwrap(), Backend::Option);
        assert!("redis".parse::<Backend>().unwrap_err().is_invalid_argument());
        assert_eq!(Backend::Transient.to_string(), "transient");
    }
}
