//! Binary-search helpers over time-sorted slices.
//!
//! All helpers assume the slice is sorted by time; callers resolve the lazy
//! sort before handing a slice in.

use crate::time::{Timestamp, TimestampedValue};

/// Index of the first entry with `time > t`.
#[inline]
pub(crate) fn upper_bound<T>(values: &[TimestampedValue<T>], t: Timestamp) -> usize {
    values.partition_point(|v| v.time() <= t)
}

/// Index of the first entry with `time >= t`.
#[inline]
pub(crate) fn lower_bound<T>(values: &[TimestampedValue<T>], t: Timestamp) -> usize {
    values.partition_point(|v| v.time() < t)
}

/// [`upper_bound`] restricted to `values[from..]`, returned as an absolute index.
#[inline]
pub(crate) fn upper_bound_from<T>(values: &[TimestampedValue<T>], t: Timestamp, from: usize) -> usize {
    let from = from.min(values.len());
    from + upper_bound(&values[from..], t)
}

/// [`lower_bound`] restricted to `values[from..]`, returned as an absolute index.
#[inline]
pub(crate) fn lower_bound_from<T>(values: &[TimestampedValue<T>], t: Timestamp, from: usize) -> usize {
    let from = from.min(values.len());
    from + lower_bound(&values[from..], t)
}

/// Index of the entry in force at `t`: the latest entry with `time <= t`.
///
/// `None` when `t` precedes every entry.
#[inline]
pub(crate) fn index_in_force<T>(values: &[TimestampedValue<T>], t: Timestamp) -> Option<usize> {
    upper_bound(values, t).checked_sub(1)
}

/// The last time of a reversed time sequence and the gap back to the previous
/// distinct time, in nanoseconds.
///
/// Runs of identical timestamps at the end are skipped. The gap is `0` when
/// every time is identical. `None` for an empty sequence.
pub(crate) fn last_step(mut times_rev: impl Iterator<Item = Timestamp>) -> Option<(Timestamp, i64)> {
    let last = times_rev.next()?;
    let step = times_rev
        .find(|t| *t < last)
        .map_or(0, |prev| last.nanos_since(prev));
    Some((last, step))
}
