//! Expiration Module
//!
//! Converts heterogeneous TTL inputs into a single signed "seconds remaining"
//! value measured against an injectable clock, and answers whether that
//! value still describes a live entry.

mod interval;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::clock::{system_clock, Clock};
use crate::error::{CacheError, Result};

pub use interval::Interval;

// == Public Constants ==
/// Stand-in horizon for "no expiration specified" (365 days).
pub const YEAR_IN_SECONDS: i64 = 31_536_000;

// == TTL Input ==
/// Every shape a caller may hand to `expires_after` or a facade `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// No TTL given; resolves to the one-year horizon
    #[default]
    Default,
    /// Relative seconds from now; `0` means already expired
    Seconds(i64),
    /// Calendar interval resolved against now
    Interval(Interval),
}

impl From<i64> for Ttl {
    fn from(secs: i64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<i32> for Ttl {
    fn from(secs: i32) -> Self {
        Ttl::Seconds(i64::from(secs))
    }
}

impl From<Option<i64>> for Ttl {
    fn from(secs: Option<i64>) -> Self {
        secs.map_or(Ttl::Default, Ttl::Seconds)
    }
}

impl From<Interval> for Ttl {
    fn from(interval: Interval) -> Self {
        Ttl::Interval(interval)
    }
}

impl From<Duration> for Ttl {
    /// Sub-second precision is dropped; durations beyond `i64::MAX` seconds
    /// saturate and are rejected when resolved.
    fn from(duration: Duration) -> Self {
        Ttl::Seconds(i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
    }
}

// == Expiration ==
/// A single pending or resolved expiration policy.
///
/// `resolved == None` means no policy was set yet, which reads as the
/// one-year horizon. Cloning copies the resolved instant and shares the clock.
#[derive(Debug, Clone)]
pub struct Expiration {
    resolved: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl Expiration {
    // == Constructor ==
    /// Creates an unset expiration measured against `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            resolved: None,
            clock,
        }
    }

    /// Returns the clock this expiration measures against.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Returns an unset copy sharing this expiration's clock.
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.clock))
    }

    /// The absolute instant this expiration resolves to, if one was set.
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved
    }

    // == Is Valid ==
    /// True while there is at least one whole second remaining.
    pub fn is_valid(&self) -> bool {
        self.expiration_in_seconds() > 0
    }

    // == Expires At ==
    /// Sets an absolute expiration. `None` resets to the one-year horizon.
    pub fn expires_at(&mut self, at: Option<DateTime<Utc>>) {
        self.resolved = at;
    }

    // == Expires After ==
    /// Sets an expiration relative to the clock's current instant.
    ///
    /// # Arguments
    /// * `ttl` - `Ttl::Default` resets to the one-year horizon, `Seconds(0)`
    ///   is treated as `-1` (expired right away), intervals are resolved now
    ///
    /// # Errors
    /// `InvalidTtl` if the resulting instant is outside the representable
    /// date range. The previous policy is left untouched in that case.
    pub fn expires_after(&mut self, ttl: impl Into<Ttl>) -> Result<()> {
        let now = self.clock.now();

        self.resolved = match ttl.into() {
            Ttl::Default => None,
            Ttl::Seconds(secs) => {
                // Zero TTL means "expired right away", not "never expires"
                let secs = if secs == 0 { -1 } else { secs };
                let resolved = TimeDelta::try_seconds(secs)
                    .and_then(|delta| now.checked_add_signed(delta))
                    .ok_or_else(|| {
                        CacheError::InvalidTtl(format!("{secs} seconds from {now} is out of range"))
                    })?;
                Some(resolved)
            }
            Ttl::Interval(interval) => {
                let resolved = interval.add_to(now).ok_or_else(|| {
                    CacheError::InvalidTtl(format!("{interval} from {now} is out of range"))
                })?;
                Some(resolved)
            }
        };

        Ok(())
    }

    // == Seconds Remaining ==
    /// Signed whole seconds until expiry, compared on Unix timestamps.
    ///
    /// # Returns
    /// - `YEAR_IN_SECONDS` if no policy was set
    /// - `0` or less once the instant has been reached
    pub fn expiration_in_seconds(&self) -> i64 {
        match self.resolved {
            Some(at) => at.timestamp() - self.clock.now().timestamp(),
            None => YEAR_IN_SECONDS,
        }
    }

    // == TTL Conversion ==
    /// Converts `ttl` into the seconds a store should keep a value for,
    /// measured against `clock`.
    pub fn ttl_in_seconds(clock: &Arc<dyn Clock>, ttl: impl Into<Ttl>) -> Result<i64> {
        let mut expiration = Expiration::new(Arc::clone(clock));
        expiration.expires_after(ttl)?;
        Ok(expiration.store_ttl())
    }

    /// Seconds to hand a store for this policy.
    ///
    /// Stores read `0` as "never expires", so a lapsed policy becomes `-1`.
    pub fn store_ttl(&self) -> i64 {
        match self.expiration_in_seconds() {
            secs if secs > 0 => secs,
            _ => -1,
        }
    }
}

impl Default for Expiration {
    fn default() -> Self {
        Self::new(system_clock())
    }
}
