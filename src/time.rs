//! Time primitives: [`Timestamp`], [`TimestampedValue`] and the half-open
//! [`TimeInterval`].
//!
//! Timestamps are whole nanoseconds since the UNIX epoch. They parse from
//! RFC 3339 or naive ISO-8601 text (read as UTC) through `chrono`, and the
//! `MIN`/`MAX` sentinels display as `-inf`/`+inf`.

use crate::error::{LogError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Nanoseconds since the UNIX epoch (UTC).
///
/// [`Timestamp::MIN`] and [`Timestamp::MAX`] double as the -inf/+inf sentinels
/// used by interval complements.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const MIN: Self = Self(i64::MIN);
    pub const MAX: Self = Self(i64::MAX);
    pub const EPOCH: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Seconds since the epoch, rounded to the nearest nanosecond.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_seconds(seconds: f64) -> Self {
        Self((seconds * 1e9).round() as i64)
    }

    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Signed nanoseconds from `earlier` to `self`, saturating at the i64 range.
    #[inline]
    #[must_use]
    pub const fn nanos_since(self, earlier: Self) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Signed seconds from `earlier` to `self`.
    ///
    /// Computed in 128-bit arithmetic so differences involving the sentinels
    /// do not overflow.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn seconds_since(self, earlier: Self) -> f64 {
        (i128::from(self.0) - i128::from(earlier.0)) as f64 / 1e9
    }

    #[inline]
    #[must_use]
    pub const fn offset_nanos(self, nanos: i64) -> Self {
        Self(self.0.saturating_add(nanos))
    }

    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn offset_seconds(self, seconds: f64) -> Self {
        self.offset_nanos((seconds * 1e9).round() as i64)
    }
}

impl FromStr for Timestamp {
    type Err = LogError;

    /// Accepts RFC 3339 (`2007-11-30T16:17:00Z`) or a naive ISO-8601 date-time
    /// (`2007-11-30T16:17:00.5`), the latter interpreted as UTC.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let nanos = match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.timestamp_nanos_opt(),
            Err(_) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()
                .and_then(|dt| dt.and_utc().timestamp_nanos_opt()),
        };
        nanos
            .map(Self)
            .ok_or_else(|| LogError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            i64::MIN => f.write_str("-inf"),
            i64::MAX => f.write_str("+inf"),
            nanos => {
                let secs = nanos.div_euclid(NANOS_PER_SECOND);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let sub = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
                match Utc.timestamp_opt(secs, sub).single() {
                    Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
                    None => write!(f, "{nanos}ns"),
                }
            }
        }
    }
}

/// A value stamped with the time it was recorded.
///
/// Ordering between entries is by time only (see [`TimestampedValue::time_cmp`]);
/// every sort in this crate is stable, so entries with equal times keep their
/// insertion order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimestampedValue<T> {
    time: Timestamp,
    value: T,
}

impl<T> TimestampedValue<T> {
    #[inline]
    pub const fn new(time: Timestamp, value: T) -> Self {
        Self { time, value }
    }

    #[inline]
    pub const fn time(&self) -> Timestamp {
        self.time
    }

    #[inline]
    pub const fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub fn into_parts(self) -> (Timestamp, T) {
        (self.time, self.value)
    }

    #[inline]
    pub fn time_cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
    }
}

/// A closed-open time range: `[start, stop)`.
///
/// Reversed or empty ranges are legal values; see [`TimeInterval::is_valid`].
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub start: Timestamp,
    pub stop: Timestamp,
}

impl TimeInterval {
    #[inline]
    #[must_use]
    pub const fn new(start: Timestamp, stop: Timestamp) -> Self {
        Self { start, stop }
    }

    /// Length in seconds; negative for a reversed range.
    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.stop.seconds_since(self.start)
    }

    /// `true` when the range is non-empty (`start < stop`).
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start < self.stop
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t < self.stop
    }

    /// `true` when the two ranges share at least one instant.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.stop && other.start < self.stop
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let out = Self::new(self.start.max(other.start), self.stop.min(other.stop));
        out.is_valid().then_some(out)
    }
}

impl Ord for TimeInterval {
    #[inline] fn cmp(&self, o: &Self) -> Ordering {
        self.start.cmp(&o.start).then(self.stop.cmp(&o.stop))
    }
}
impl PartialOrd for TimeInterval {
    #[inline] fn partial_cmp(&self, o: &Self) -> Option<Ordering> { Some(self.cmp(o)) }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}
