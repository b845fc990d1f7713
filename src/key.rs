//! Key Validation
//!
//! Shared key checks used by the pool and the simple-cache facades.

use crate::error::{CacheError, Result};

/// Characters no cache key may contain.
pub const RESERVED_CHARACTERS: &str = "{}()/\\@:";

// == Validate Key ==
/// Rejects empty keys and keys containing any of [`RESERVED_CHARACTERS`].
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::invalid_key(key, "key must not be empty"));
    }

    if let Some(c) = key.chars().find(|c| RESERVED_CHARACTERS.contains(*c)) {
        return Err(CacheError::invalid_key(
            key,
            format!("reserved character {c:?} (reserved: {RESERVED_CHARACTERS})"),
        ));
    }

    Ok(())
}

/// Validates every key, collecting them so no mutation starts before the
/// whole batch is known to be valid.
pub fn validate_keys<I, K>(keys: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    keys.into_iter()
        .map(|key| {
            let key = key.as_ref();
            validate_key(key)?;
            Ok(key.to_string())
        })
        .collect()
}
