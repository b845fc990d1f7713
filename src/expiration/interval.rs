//! Calendar Interval Module
//!
//! A structured, calendar-aware duration (years, months, days, hours,
//! minutes, seconds) that is resolved against a concrete instant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, TimeDelta, Utc};

use crate::error::{CacheError, Result};

// == Interval ==
/// A calendar interval such as "1 year and 1 day".
///
/// Year and month components are applied with calendar arithmetic, so the
/// number of seconds an interval spans depends on the instant it is
/// resolved against (a year starting in a leap year is one day longer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    /// Calendar years
    pub years: u32,
    /// Calendar months
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Interval {
    /// An interval of `n` years.
    pub fn years(n: u32) -> Self {
        Self {
            years: n,
            ..Self::default()
        }
    }

    /// An interval of `n` months.
    pub fn months(n: u32) -> Self {
        Self {
            months: n,
            ..Self::default()
        }
    }

    /// An interval of `n` days.
    pub fn days(n: u32) -> Self {
        Self {
            days: n,
            ..Self::default()
        }
    }

    /// An interval of `n` hours.
    pub fn hours(n: u32) -> Self {
        Self {
            hours: n,
            ..Self::default()
        }
    }

    /// An interval of `n` seconds.
    pub fn seconds(n: u32) -> Self {
        Self {
            seconds: n,
            ..Self::default()
        }
    }

    /// Adds `n` days to this interval.
    pub fn and_days(mut self, n: u32) -> Self {
        self.days = self.days.saturating_add(n);
        self
    }

    /// Adds `n` seconds to this interval.
    pub fn and_seconds(mut self, n: u32) -> Self {
        self.seconds = self.seconds.saturating_add(n);
        self
    }

    /// True if every component is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    // == Resolve ==
    /// Returns `anchor` moved forward by this interval.
    ///
    /// Date components are applied first, then the time components, so
    /// `P1M` from January 31st lands on the last day of February.
    ///
    /// # Returns
    /// - `None` if the result falls outside the representable date range
    pub fn add_to(&self, anchor: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = self.years.checked_mul(12)?.checked_add(self.months)?;
        let clock_secs = i64::from(self.hours) * 3_600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);

        anchor
            .checked_add_months(Months::new(months))?
            .checked_add_days(Days::new(u64::from(self.days)))?
            .checked_add_signed(TimeDelta::try_seconds(clock_secs)?)
    }

    /// Number of whole seconds this interval spans when started at `anchor`.
    pub fn seconds_from(&self, anchor: DateTime<Utc>) -> Option<i64> {
        self.add_to(anchor)
            .map(|end| end.timestamp() - anchor.timestamp())
    }
}

// == ISO 8601 Parsing ==
impl FromStr for Interval {
    type Err = CacheError;

    /// Parses an ISO 8601 duration such as `P1Y2M10DT2H30M` or `P2W`.
    fn from_str(text: &str) -> Result<Self> {
        let invalid = || CacheError::InvalidArgument(format!("Unknown or bad interval format {text:?}"));

        let body = text.trim().strip_prefix('P').ok_or_else(invalid)?;
        if body.is_empty() {
            return Err(invalid());
        }

        let mut interval = Interval::default();
        let mut in_time = false;
        let mut time_parts = 0;
        let mut digits = String::new();

        for c in body.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }

            if c == 'T' {
                if in_time || !digits.is_empty() {
                    return Err(invalid());
                }
                in_time = true;
                continue;
            }

            let n: u32 = digits.parse().map_err(|_| invalid())?;
            digits.clear();

            match (in_time, c) {
                (false, 'Y') => interval.years = n,
                (false, 'M') => interval.months = n,
                (false, 'W') => interval.days = interval.days.saturating_add(n.saturating_mul(7)),
                (false, 'D') => interval.days = interval.days.saturating_add(n),
                (true, 'H') => interval.hours = n,
                (true, 'M') => interval.minutes = n,
                (true, 'S') => interval.seconds = n,
                _ => return Err(invalid()),
            }
            if in_time {
                time_parts += 1;
            }
        }

        // Trailing digits without a designator, or a `T` with nothing after it
        if !digits.is_empty() || (in_time && time_parts == 0) {
            return Err(invalid());
        }

        Ok(interval)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        for (n, unit) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if n > 0 {
                write!(f, "{n}{unit}")?;
            }
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            write!(f, "T")?;
            for (n, unit) in [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')] {
                if n > 0 {
                    write!(f, "{n}{unit}")?;
                }
            }
        }
        if self.is_zero() {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    // 2021-01-01T00:00:00Z, start of a non-leap year
    const JAN_2021: i64 = 1_609_459_200;
    // 2024-01-01T00:00:00Z, start of a leap year
    const JAN_2024: i64 = 1_704_067_200;

    #[test]
    fn test_one_year_spans_365_days_in_common_year() {
        assert_eq!(Interval::years(1).seconds_from(at(JAN_2021)), Some(31_536_000));
    }

    #[test]
    fn test_one_year_spans_366_days_in_leap_year() {
        assert_eq!(Interval::years(1).seconds_from(at(JAN_2024)), Some(31_622_400));
    }

    #[test]
    fn test_mixed_components() {
        let interval = Interval::years(1).and_days(1);
        assert_eq!(interval.seconds_from(at(JAN_2021)), Some(31_536_000 + 86_400));

        let interval = Interval {
            hours: 1,
            minutes: 2,
            seconds: 3,
            ..Interval::default()
        };
        assert_eq!(interval.seconds_from(at(JAN_2021)), Some(3_723));
    }

    #[test]
    fn test_out_of_range_resolution() {
        let far = DateTime::<Utc>::MAX_UTC;
        assert_eq!(Interval::days(1).add_to(far), None);
        assert_eq!(Interval::years(u32::MAX).add_to(at(0)), None);
    }

    #[test]
    fn test_parse_iso8601() {
        let parsed: Interval = "P1Y2M10DT2H30M5S".parse().unwrap();
        assert_eq!(
            parsed,
            Interval {
                years: 1,
                months: 2,
                days: 10,
                hours: 2,
                minutes: 30,
                seconds: 5,
            }
        );

        assert_eq!("P1D".parse::<Interval>().unwrap(), Interval::days(1));
        assert_eq!("PT45S".parse::<Interval>().unwrap(), Interval::seconds(45));
        assert_eq!("P2W".parse::<Interval>().unwrap(), Interval::days(14));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "P", "1Y", "PT", "P1", "P1H", "PT1D", "P1YT", "PXY"] {
            let result = bad.parse::<Interval>();
            assert!(
                matches!(result, Err(CacheError::InvalidArgument(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["P1Y", "P1Y1D", "PT2H30M", "P3DT4S", "PT0S"] {
            let interval: Interval = text.parse().unwrap();
            assert_eq!(interval.to_string(), text);
        }
    }
}
