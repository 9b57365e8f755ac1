//! Pre-built logs and time helpers for common testing scenarios.
//!
//! All fixtures start at [`FIXTURE_START`], `2007-11-30T16:17:00` UTC.

use crate::series::TimeSeries;
use crate::time::Timestamp;

/// Base time of every fixture.
pub const FIXTURE_START: &str = "2007-11-30T16:17:00";

/// Parse an ISO-8601 timestamp.
///
/// # Panics
///
/// Panics if `text` is not a valid timestamp; meant for literals in tests.
///
/// # Example
///
/// ```
/// use ironlog::testing::ts;
///
/// let a = ts("2007-11-30T16:17:00");
/// let b = ts("2007-11-30T16:17:10");
/// assert_eq!(b.seconds_since(a), 10.0);
/// ```
#[must_use]
pub fn ts(text: &str) -> Timestamp {
    match text.parse() {
        Ok(t) => t,
        Err(e) => panic!("bad fixture timestamp: {e}"),
    }
}

/// A four-point `f64` log sampled every 10 s:
/// `9.99, 7.55, 5.55, 10.55`.
///
/// # Example
///
/// ```
/// use ironlog::testing::sample_double_log;
///
/// let log = sample_double_log();
/// assert_eq!(log.size(), 4);
/// assert_eq!(log.name(), "double_log");
/// ```
#[must_use]
pub fn sample_double_log() -> TimeSeries<f64> {
    let start = ts(FIXTURE_START);
    let mut log = TimeSeries::new("double_log");
    for (i, value) in (0u32..).zip([9.99, 7.55, 5.55, 10.55]) {
        log.add_value(start.offset_seconds(10.0 * f64::from(i)), value);
    }
    log
}

/// Ten `i32` samples `0..10`, one every 30 s.
#[must_use]
pub fn ten_sample_log() -> TimeSeries<i32> {
    let start = ts(FIXTURE_START);
    let mut log = TimeSeries::new("ten_samples");
    for i in 0..10 {
        log.add_value(start.offset_seconds(30.0 * f64::from(i)), i);
    }
    log
}

/// A boolean mask over the four-point log: good for the first 15 s, bad for
/// 10 s, then good again from 16:17:25.
#[must_use]
pub fn sample_mask() -> TimeSeries<bool> {
    let start = ts(FIXTURE_START);
    let mut mask = TimeSeries::new("mask");
    mask.add_value(start, true);
    mask.add_value(start.offset_seconds(15.0), false);
    mask.add_value(start.offset_seconds(25.0), true);
    mask
}
