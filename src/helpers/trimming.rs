//! Restricting a series to a [`TimeROI`].
//!
//! The entries kept for an ROI are, per region, the entry in force when the
//! region starts plus every entry strictly inside it. Each entry is kept at
//! most once even when it is in force at the start of several regions.

use crate::roi::TimeROI;
use crate::series::TimeSeries;
use crate::time::{Timestamp, TimestampedValue};
use crate::utils::{index_in_force, lower_bound_from};
use crate::value::LogValue;

impl<T: LogValue> TimeSeries<T> {
    /// Values kept by `roi`, in time order.
    #[must_use]
    pub fn filtered_values_as_vector(&self, roi: &TimeROI) -> Vec<T> {
        let values = self.sorted();
        kept_indices(&values, roi)
            .into_iter()
            .map(|i| values[i].value().clone())
            .collect()
    }

    /// Times kept by `roi`, in order.
    #[must_use]
    pub fn filtered_times_as_vector(&self, roi: &TimeROI) -> Vec<Timestamp> {
        let values = self.sorted();
        kept_indices(&values, roi)
            .into_iter()
            .map(|i| values[i].time())
            .collect()
    }

    /// Drop every entry [`TimeSeries::filtered_values_as_vector`] would not
    /// return. Kept entries keep their original times.
    ///
    /// [`TimeROI::use_all`] is a no-op; [`TimeROI::use_none`] clears the log.
    pub fn remove_data_outside_roi(&mut self, roi: &TimeROI) {
        if roi.is_use_all() {
            return;
        }
        if roi.is_use_none() {
            self.clear();
            return;
        }
        let keep = kept_indices(&self.sorted(), roi);
        let values = self.values_mut();
        let mut keep = keep.into_iter().peekable();
        let kept: Vec<TimestampedValue<T>> = values
            .drain(..)
            .enumerate()
            .filter(|(i, _)| keep.next_if_eq(i).is_some())
            .map(|(_, v)| v)
            .collect();
        *values = kept;
    }

    /// [`TimeSeries::remove_data_outside_roi`] for the single region
    /// `[start, stop)`. A reversed or empty range clears the log.
    pub fn filter_by_time(&mut self, start: Timestamp, stop: Timestamp) {
        self.remove_data_outside_roi(&TimeROI::new(start, stop));
    }
}

/// Ascending indices of the entries kept by `roi`.
///
/// Of several entries recorded exactly at a region start, only the last is
/// kept.
pub(crate) fn kept_indices<T>(values: &[TimestampedValue<T>], roi: &TimeROI) -> Vec<usize> {
    if roi.is_use_none() || values.is_empty() {
        return Vec::new();
    }
    if roi.is_use_all() {
        return (0..values.len()).collect();
    }
    let mut out = Vec::new();
    let mut next_unused = 0;
    for region in roi.to_time_intervals() {
        // A region starting before every entry has no entry in force and
        // only picks up entries inside it.
        let first = index_in_force(values, region.start).unwrap_or(0).max(next_unused);
        let end = lower_bound_from(values, region.stop, first);
        out.extend(first..end);
        next_unused = next_unused.max(end);
    }
    out
}
