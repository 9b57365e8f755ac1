//! Assertion functions for testing series and interval outputs.

use crate::interval::SplitIntervalSet;
use crate::series::TimeSeries;
use crate::time::Timestamp;
use crate::value::LogValue;

/// Assert that two floats agree within `tolerance`.
///
/// Two `NaN`s compare equal, so "no data" results can be asserted directly.
///
/// # Panics
///
/// Panics if the values differ by more than `tolerance`.
///
/// # Example
///
/// ```
/// use ironlog::testing::assert_close;
///
/// assert_close(0.1 + 0.2, 0.3, 1e-12);
/// assert_close(f64::NAN, f64::NAN, 0.0);
/// ```
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    if actual.is_nan() && expected.is_nan() {
        return;
    }
    assert!(
        (actual - expected).abs() <= tolerance,
        "Values differ by more than {tolerance}:\n  Expected: {expected}\n  Actual: {actual}\n  Difference: {}",
        (actual - expected).abs()
    );
}

/// Assert that a series holds exactly `expected`, in time order.
///
/// # Panics
///
/// Panics on a length or entry mismatch, printing both sides.
///
/// # Example
///
/// ```
/// use ironlog::{TimeSeries, Timestamp};
/// use ironlog::testing::assert_series_eq;
///
/// let mut s = TimeSeries::new("x");
/// s.add_value(Timestamp::from_nanos(2), 20);
/// s.add_value(Timestamp::from_nanos(1), 10);
/// assert_series_eq(&s, &[(Timestamp::from_nanos(1), 10), (Timestamp::from_nanos(2), 20)]);
/// ```
pub fn assert_series_eq<T: LogValue>(series: &TimeSeries<T>, expected: &[(Timestamp, T)]) {
    let actual: Vec<(Timestamp, T)> = series
        .entries()
        .into_iter()
        .map(crate::time::TimestampedValue::into_parts)
        .collect();

    assert_eq!(
        actual.len(),
        expected.len(),
        "Series '{}' length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        series.name(),
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            a == e,
            "Series '{}' mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}",
            series.name()
        );
    }
}

/// Assert that an interval set holds exactly the `(start, stop, destination)`
/// triples in `expected`, in order.
///
/// # Panics
///
/// Panics on a length or interval mismatch.
pub fn assert_intervals_eq(actual: &SplitIntervalSet, expected: &[(Timestamp, Timestamp, i32)]) {
    let actual: Vec<(Timestamp, Timestamp, i32)> = actual
        .iter()
        .map(|i| (i.start(), i.stop(), i.destination()))
        .collect();
    assert_eq!(
        actual.len(),
        expected.len(),
        "Interval count mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a, e, "Interval mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}");
    }
}
