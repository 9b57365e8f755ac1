//! A filtered view over a [`TimeSeries`].
//!
//! The filter is a list of `(time, included)` transitions. Readers see only
//! the entries that fall in included regions, without the underlying data
//! being copied. The mapping from "n-th visible entry" to a raw index goes
//! through a small table of [`Region`]s, rebuilt lazily after the filter or
//! the data changes.

use crate::error::Result;
use crate::interval::{SplitInterval, SplitIntervalSet};
use crate::roi::TimeROI;
use crate::series::{TimeSeries, fake_end};
use crate::time::{TimeInterval, Timestamp, TimestampedValue};
use crate::utils::{last_step, lower_bound_from, upper_bound_from};
use crate::value::LogValue;
use log::{debug, warn};
use std::cell::{Cell, RefCell};

/// One included region of the filter, resolved against the sorted entries.
///
/// `filter_start`/`filter_end` index the transition list; `value_start..value_end`
/// is the half-open range of raw entries the region contributes, and
/// `count_before` is the number of visible entries in earlier regions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub filter_start: usize,
    pub value_start: usize,
    pub value_end: usize,
    pub filter_end: usize,
    pub count_before: usize,
}

impl Region {
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.value_end - self.value_start
    }
}

/// A [`TimeSeries`] seen through a boolean time filter.
///
/// With no filter every entry is visible and each reader defers to the
/// wrapped series.
///
/// # Example
/// ```
/// use ironlog::{FilteredTimeSeries, TimeROI, TimeSeries, Timestamp};
///
/// let s = |x: f64| Timestamp::from_seconds(x);
/// let mut log = TimeSeries::new("x");
/// for i in 0..5 {
///     log.add_value(s(f64::from(i) * 10.0), i);
/// }
/// let mut view = FilteredTimeSeries::new(log);
/// view.filter_with_roi(&TimeROI::new(s(15.0), s(35.0)));
///
/// assert_eq!(view.size(), 3);
/// assert_eq!(view.values_as_vector(), vec![1, 2, 3]);
/// assert_eq!(view.real_size(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct FilteredTimeSeries<T> {
    series: TimeSeries<T>,
    filter: Vec<(Timestamp, bool)>,
    regions: RefCell<Vec<Region>>,
    size: Cell<usize>,
    dirty: Cell<bool>,
}

impl<T: LogValue> FilteredTimeSeries<T> {
    #[must_use]
    pub fn new(series: TimeSeries<T>) -> Self {
        Self {
            series,
            filter: Vec::new(),
            regions: RefCell::new(Vec::new()),
            size: Cell::new(0),
            dirty: Cell::new(true),
        }
    }

    #[must_use]
    pub const fn series(&self) -> &TimeSeries<T> {
        &self.series
    }

    #[must_use]
    pub fn into_inner(self) -> TimeSeries<T> {
        self.series
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.series.name()
    }

    /// Append to the wrapped series.
    pub fn add_value(&mut self, time: Timestamp, value: T) {
        self.series.add_value(time, value);
        self.dirty.set(true);
    }

    /// The transition list.
    #[must_use]
    pub fn filter(&self) -> &[(Timestamp, bool)] {
        &self.filter
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.dirty.set(true);
    }

    /// Rebuild the filter from a boolean mask.
    ///
    /// Only transitions are kept. A mask ending `true` is closed one step after
    /// the later of the mask's and the log's last time, the step being the gap
    /// back to the previous distinct time of whichever series ends later; with
    /// no such gap the region stays open. An empty mask clears the filter.
    pub fn filter_with(&mut self, mask: &TimeSeries<bool>) {
        let mask_entries = mask.entries();
        if mask_entries.is_empty() {
            warn!("empty mask for '{}'; filter cleared", self.series.name());
            self.clear_filter();
            return;
        }

        let mut filter: Vec<(Timestamp, bool)> = Vec::new();
        for entry in &mask_entries {
            if filter.last().is_none_or(|(_, state)| state != entry.value()) {
                filter.push((entry.time(), *entry.value()));
            }
        }

        if filter.last().is_some_and(|(_, state)| *state) {
            let mask_end = last_step(mask_entries.iter().rev().map(|e| e.time()));
            let log_end = last_step(self.series.times_as_vector().into_iter().rev());
            let end = match (mask_end, log_end) {
                (Some(m), Some(l)) if l.0 > m.0 => l,
                (Some(m), _) => m,
                (None, Some(l)) => l,
                (None, None) => (Timestamp::MAX, 0),
            };
            let close = match end {
                (_, 0) => Timestamp::MAX,
                (last, step) => last.offset_nanos(step),
            };
            filter.push((close, false));
        }

        self.filter = filter;
        self.dirty.set(true);
    }

    /// Use the regions of `roi` as the filter.
    ///
    /// [`TimeROI::use_all`] clears the filter; [`TimeROI::use_none`] hides
    /// every entry.
    pub fn filter_with_roi(&mut self, roi: &TimeROI) {
        if roi.is_use_all() {
            self.clear_filter();
            return;
        }
        self.filter = if roi.is_use_none() {
            vec![(Timestamp::MIN, false)]
        } else {
            roi.to_time_intervals()
                .into_iter()
                .flat_map(|r| [(r.start, true), (r.stop, false)])
                .collect()
        };
        self.dirty.set(true);
    }

    /* ---------------- quick reference ---------------- */

    /// Resolve the transition list against the sorted entries.
    ///
    /// Each region starts at the entry in force at its start time (index 0 if
    /// the region starts before the log, nothing if it starts after the last
    /// entry) and ends before the first entry at or after its end time. An
    /// entry already claimed by an earlier region is not counted again.
    /// When several entries share the start time only the last of them is in
    /// force, so the earlier ones stay hidden even though `split_by_time`
    /// routes all of them.
    /// Searches only look forward from the previous region, so the whole pass
    /// is near linear.
    fn apply_filter(&self) {
        if !self.dirty.get() {
            return;
        }
        let mut regions = self.regions.borrow_mut();
        regions.clear();
        if self.filter.is_empty() {
            self.size.set(self.series.size());
            self.dirty.set(false);
            return;
        }

        // (filter_start, start time, filter_end, stop time) per included region.
        let mut spans = Vec::new();
        let mut open: Option<(usize, Timestamp)> = None;
        for (index, &(time, included)) in self.filter.iter().enumerate() {
            match (included, open) {
                (true, None) => open = Some((index, time)),
                (false, Some((start_index, start))) => {
                    spans.push((start_index, start, index, time));
                    open = None;
                }
                // Repeated or dangling transitions carry no region.
                _ => {}
            }
        }
        if let Some((start_index, start)) = open {
            spans.push((start_index, start, self.filter.len(), Timestamp::MAX));
        }

        let values = self.series.sorted();
        let n = values.len();
        let mut claimed = 0usize;
        let mut total = 0usize;
        for (filter_start, start, filter_end, stop) in spans {
            let value_start = if values.last().is_some_and(|last| last.time() < start) {
                n
            } else {
                upper_bound_from(&values, start, claimed.saturating_sub(1))
                    .saturating_sub(1)
                    .max(claimed)
            };
            let value_end = lower_bound_from(&values, stop, value_start);
            regions.push(Region {
                filter_start,
                value_start,
                value_end,
                filter_end,
                count_before: total,
            });
            total += value_end - value_start;
            claimed = claimed.max(value_end);
        }

        debug!(
            "filter on '{}': {} regions, {total} of {n} values visible",
            self.series.name(),
            regions.len()
        );
        self.size.set(total);
        self.dirty.set(false);
    }

    /// Snapshot of the resolved regions.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        self.apply_filter();
        self.regions.borrow().clone()
    }

    /// Number of visible entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.apply_filter();
        self.size.get()
    }

    /// Number of entries in the wrapped series.
    #[must_use]
    pub fn real_size(&self) -> usize {
        self.series.size()
    }

    // Raw index of the n-th visible entry (clamped), with its region.
    fn locate(&self, n: usize) -> Result<(usize, Option<Region>)> {
        self.apply_filter();
        let size = self.size.get();
        if size == 0 {
            return Err(self.series.empty_error());
        }
        let n = n.min(size - 1);
        if !self.is_filtered() {
            return Ok((n, None));
        }
        let regions = self.regions.borrow();
        let region = regions
            .iter()
            .find(|r| n < r.count_before + r.count())
            .copied()
            .ok_or_else(|| self.series.empty_error())?;
        Ok((region.value_start + (n - region.count_before), Some(region)))
    }

    /// # Errors
    /// [`crate::LogError::EmptySeries`] when nothing is visible.
    pub fn nth_value(&self, n: usize) -> Result<T> {
        let (raw, _) = self.locate(n)?;
        self.series.nth_value(raw)
    }

    /// # Errors
    /// [`crate::LogError::EmptySeries`] when nothing is visible.
    pub fn nth_time(&self, n: usize) -> Result<Timestamp> {
        let (raw, _) = self.locate(n)?;
        self.series.nth_time(raw)
    }

    /// The span of the `n`-th visible entry, clipped to its region.
    ///
    /// # Errors
    /// [`crate::LogError::EmptySeries`] when nothing is visible.
    pub fn nth_interval(&self, n: usize) -> Result<TimeInterval> {
        let (raw, region) = self.locate(n)?;
        let Some(region) = region else {
            return self.series.nth_interval(raw);
        };
        let values = self.series.sorted();
        let region_start = self.filter[region.filter_start].0;
        let region_stop = self
            .filter
            .get(region.filter_end)
            .map_or(Timestamp::MAX, |(t, _)| *t);
        let stop = values
            .get(raw + 1)
            .map_or_else(|| fake_end(&values), |next| next.time());
        Ok(TimeInterval::new(
            values[raw].time().max(region_start),
            stop.min(region_stop),
        ))
    }

    /// Visible values in time order.
    #[must_use]
    pub fn values_as_vector(&self) -> Vec<T> {
        self.visible(|entry| entry.value().clone())
    }

    /// Visible times in order.
    #[must_use]
    pub fn times_as_vector(&self) -> Vec<Timestamp> {
        self.visible(|entry| entry.time())
    }

    fn visible<O>(&self, f: impl Fn(&TimestampedValue<T>) -> O) -> Vec<O> {
        self.apply_filter();
        let values = self.series.sorted();
        if !self.is_filtered() {
            return values.iter().map(f).collect();
        }
        self.regions
            .borrow()
            .iter()
            .flat_map(|r| values[r.value_start..r.value_end].iter())
            .map(f)
            .collect()
    }

    /// # Errors
    /// [`crate::LogError::EmptySeries`] when nothing is visible.
    pub fn first_value(&self) -> Result<T> {
        self.nth_value(0)
    }

    /// # Errors
    /// [`crate::LogError::EmptySeries`] when nothing is visible.
    pub fn last_value(&self) -> Result<T> {
        self.nth_value(usize::MAX)
    }

    /// The included regions as a filter, read straight from the transitions.
    ///
    /// Without a filter this is `[first_time, last_time)` of the series (empty
    /// for an empty series).
    #[must_use]
    pub fn get_splitting_intervals(&self) -> SplitIntervalSet {
        if self.filter.is_empty() {
            return match (self.series.first_time(), self.series.last_time()) {
                (Ok(first), Ok(last)) => vec![SplitInterval::new(first, last, 0)].into(),
                _ => SplitIntervalSet::new(),
            };
        }
        let mut out = SplitIntervalSet::new();
        let mut open: Option<Timestamp> = None;
        for &(time, included) in &self.filter {
            match (included, open) {
                (true, None) => open = Some(time),
                (false, Some(start)) => {
                    out.push(SplitInterval::new(start, time, 0));
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            out.push(SplitInterval::new(start, Timestamp::MAX, 0));
        }
        out
    }

    /// Time-weighted mean over the visible regions; the plain series average
    /// when unfiltered.
    ///
    /// # Errors
    /// [`crate::LogError::UnsupportedType`] for text series.
    pub fn time_average_value(&self) -> Result<f64> {
        if !self.is_filtered() {
            return self.series.time_average_value(None);
        }
        let intervals: Vec<TimeInterval> = self
            .get_splitting_intervals()
            .iter()
            .map(SplitInterval::interval)
            .collect();
        self.series.average_value_in_intervals(&intervals)
    }
}

impl<T: LogValue> From<TimeSeries<T>> for FilteredTimeSeries<T> {
    fn from(series: TimeSeries<T>) -> Self {
        Self::new(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_nanos(secs * 1_000_000_000)
    }

    fn view() -> FilteredTimeSeries<i32> {
        let times: Vec<Timestamp> = (0..5).map(|i| t(i * 10)).collect();
        FilteredTimeSeries::new(TimeSeries::from_vectors("x", &times, &[0, 1, 2, 3, 4]).unwrap())
    }

    fn mask(points: &[(i64, bool)]) -> TimeSeries<bool> {
        let mut m = TimeSeries::new("mask");
        for &(s, v) in points {
            m.add_value(t(s), v);
        }
        m
    }

    #[test]
    fn leading_false_is_dropped_and_trailing_true_is_closed() {
        let mut v = view();
        v.filter_with(&mask(&[(0, false), (5, true), (7, true), (25, false), (35, true)]));
        // Mask ends at 35 (step 10), log at 40 (step 10): close at 50.
        assert_eq!(v.filter().last(), Some(&(t(50), false)));
        assert_eq!(v.values_as_vector(), vec![0, 1, 2, 3, 4]);
        assert_eq!(v.size(), 5);
    }

    #[test]
    fn interval_is_clipped_to_region() {
        let mut v = view();
        v.filter_with_roi(&TimeROI::new(t(15), t(25)));
        assert_eq!(v.values_as_vector(), vec![1, 2]);
        assert_eq!(v.nth_interval(0).unwrap(), TimeInterval::new(t(15), t(20)));
        assert_eq!(v.nth_interval(9).unwrap(), TimeInterval::new(t(20), t(25)));
    }

    #[test]
    fn region_after_last_value_contributes_nothing() {
        let mut v = view();
        v.filter_with_roi(&TimeROI::new(t(100), t(200)));
        assert_eq!(v.size(), 0);
        assert!(v.nth_value(0).is_err());
        assert_eq!(v.regions().len(), 1);
    }

    #[test]
    fn empty_mask_clears_filter() {
        let mut v = view();
        v.filter_with_roi(&TimeROI::use_none());
        assert_eq!(v.size(), 0);
        v.filter_with(&TimeSeries::new("empty"));
        assert!(!v.is_filtered());
        assert_eq!(v.size(), 5);
    }
}
