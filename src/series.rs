//! The core [`TimeSeries`] container.
//!
//! A series is an append-only sequence of [`TimestampedValue`]s that is sorted
//! lazily: appends only record whether order may have been broken, and the
//! first read that needs order resolves it with a stable sort. Statistics,
//! value filters, ROI trimming and splitting live in `helpers/` as further
//! `impl TimeSeries<T>` blocks.

use crate::error::{LogError, Result};
use crate::roi::TimeROI;
use crate::time::{TimeInterval, Timestamp, TimestampedValue};
use crate::utils::{index_in_force, last_step, lower_bound};
use crate::value::LogValue;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, Ref, RefCell};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Whether the stored entries are known to be in time order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortState {
    #[default]
    Sorted,
    Unsorted,
    Unknown,
}

fn unknown_state() -> Cell<SortState> {
    Cell::new(SortState::Unknown)
}

/// An ordered, appendable log of timestamped values.
///
/// Readers take `&self`; the sort cache is held in a `RefCell`/`Cell` pair, so
/// a series is `Send` but not `Sync`. Reads that need a value fail with
/// [`LogError::EmptySeries`] on an empty series; index reads past the end clamp
/// to the last entry.
///
/// # Example
/// ```
/// use ironlog::{TimeSeries, Timestamp};
///
/// let mut log = TimeSeries::new("temperature");
/// log.add_value(Timestamp::from_seconds(20.0), 3.0);
/// log.add_value(Timestamp::from_seconds(10.0), 1.0);
///
/// assert_eq!(log.values_as_vector(), vec![1.0, 3.0]);
/// assert_eq!(log.get_single_value(Timestamp::from_seconds(15.0))?, 1.0);
/// # Ok::<(), ironlog::LogError>(())
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "T: LogValue", deserialize = "T: LogValue"))]
pub struct TimeSeries<T> {
    name: String,
    #[serde(default)]
    units: String,
    values: RefCell<Vec<TimestampedValue<T>>>,
    #[serde(skip, default = "unknown_state")]
    sort_state: Cell<SortState>,
}

impl<T: LogValue> TimeSeries<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: String::new(),
            values: RefCell::new(Vec::new()),
            sort_state: Cell::new(SortState::Sorted),
        }
    }

    /// Build a series from parallel time and value slices.
    ///
    /// # Errors
    /// [`LogError::LengthMismatch`] when the slices differ in length.
    pub fn from_vectors(name: impl Into<String>, times: &[Timestamp], values: &[T]) -> Result<Self> {
        let mut series = Self::new(name);
        series.create(times, values)?;
        Ok(series)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    /// Number of stored entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.values.borrow().len()
    }

    /// Number of stored entries, ignoring any filtered view built on top.
    #[must_use]
    pub fn real_size(&self) -> usize {
        self.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// The cached order state, without resolving it.
    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.sort_state.get()
    }

    /* ---------------- mutation ---------------- */

    /// Append one entry.
    ///
    /// O(1): the order state is updated with a single comparison against the
    /// previous last entry.
    pub fn add_value(&mut self, time: Timestamp, value: T) {
        let values = self.values.get_mut();
        if self.sort_state.get() == SortState::Sorted
            && values.last().is_some_and(|last| time < last.time())
        {
            self.sort_state.set(SortState::Unsorted);
        }
        values.push(TimestampedValue::new(time, value));
    }

    /// Append entries from parallel slices.
    ///
    /// # Errors
    /// [`LogError::LengthMismatch`] when the slices differ in length; nothing
    /// is appended in that case.
    pub fn add_values(&mut self, times: &[Timestamp], values: &[T]) -> Result<()> {
        if times.len() != values.len() {
            return Err(LogError::LengthMismatch {
                expected: times.len(),
                found: values.len(),
            });
        }
        if times.is_empty() {
            return Ok(());
        }
        self.values.get_mut().extend(
            times
                .iter()
                .zip(values)
                .map(|(t, v)| TimestampedValue::new(*t, v.clone())),
        );
        self.sort_state.set(SortState::Unknown);
        Ok(())
    }

    /// Replace the content with entries from parallel slices.
    ///
    /// # Errors
    /// [`LogError::LengthMismatch`]; the series is left untouched.
    pub fn create(&mut self, times: &[Timestamp], values: &[T]) -> Result<()> {
        if times.len() != values.len() {
            return Err(LogError::LengthMismatch {
                expected: times.len(),
                found: values.len(),
            });
        }
        self.clear();
        self.add_values(times, values)
    }

    /// Same as [`TimeSeries::create`]; kept for callers that update an
    /// existing log in place.
    ///
    /// # Errors
    /// [`LogError::LengthMismatch`]; the series is left untouched.
    pub fn replace_values(&mut self, times: &[Timestamp], values: &[T]) -> Result<()> {
        self.create(times, values)
    }

    pub fn clear(&mut self) {
        self.values.get_mut().clear();
        self.sort_state.set(SortState::Sorted);
    }

    /// Drop everything except the most recent entry.
    pub fn clear_outdated(&mut self) {
        if self.size() <= 1 {
            return;
        }
        self.sort_if_necessary();
        let values = self.values.get_mut();
        let keep = values.len() - 1;
        values.drain(..keep);
    }

    /// Append every entry of `other`.
    pub fn merge(&mut self, other: &Self) {
        let incoming = other.values.borrow();
        if incoming.is_empty() {
            return;
        }
        self.values.get_mut().extend(incoming.iter().cloned());
        self.sort_state.set(SortState::Unknown);
    }

    /// Collapse entries sharing a timestamp, keeping the last one inserted.
    pub fn eliminate_duplicates(&mut self) {
        self.sort_if_necessary();
        let values = self.values.get_mut();
        // Stable sort keeps insertion order among equal times, so the survivor
        // of each run must be its last element.
        let mut out: Vec<TimestampedValue<T>> = Vec::with_capacity(values.len());
        for entry in values.drain(..) {
            match out.last_mut() {
                Some(prev) if prev.time() == entry.time() => *prev = entry,
                _ => out.push(entry),
            }
        }
        *values = out;
    }

    /* ---------------- ordering ---------------- */

    /// Resolve the lazy order state, sorting (stably) if required.
    pub(crate) fn sort_if_necessary(&self) {
        match self.sort_state.get() {
            SortState::Sorted => {}
            SortState::Unknown => {
                let in_order = self
                    .values
                    .borrow()
                    .windows(2)
                    .all(|w| w[0].time() <= w[1].time());
                if in_order {
                    self.sort_state.set(SortState::Sorted);
                } else {
                    self.sort();
                }
            }
            SortState::Unsorted => self.sort(),
        }
    }

    fn sort(&self) {
        self.values.borrow_mut().sort_by(TimestampedValue::time_cmp);
        self.sort_state.set(SortState::Sorted);
    }

    /// The entries in time order.
    ///
    /// The order state is `Sorted` before the borrow is taken, so later reads
    /// never need a mutable borrow while this one is alive.
    pub(crate) fn sorted(&self) -> Ref<'_, [TimestampedValue<T>]> {
        self.sort_if_necessary();
        Ref::map(self.values.borrow(), Vec::as_slice)
    }

    /// Direct access to the entries, bypassing the order state.
    pub(crate) fn values_mut(&mut self) -> &mut Vec<TimestampedValue<T>> {
        self.values.get_mut()
    }

    pub(crate) fn empty_error(&self) -> LogError {
        LogError::EmptySeries(self.name.clone())
    }

    /* ---------------- snapshots ---------------- */

    #[must_use]
    pub fn values_as_vector(&self) -> Vec<T> {
        self.sorted().iter().map(|v| v.value().clone()).collect()
    }

    #[must_use]
    pub fn times_as_vector(&self) -> Vec<Timestamp> {
        self.sorted().iter().map(TimestampedValue::time).collect()
    }

    /// Times as seconds relative to the first entry.
    #[must_use]
    pub fn times_as_vector_seconds(&self) -> Vec<f64> {
        let values = self.sorted();
        let Some(first) = values.first().map(TimestampedValue::time) else {
            return Vec::new();
        };
        values.iter().map(|v| v.time().seconds_since(first)).collect()
    }

    /// Sorted copy of all entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TimestampedValue<T>> {
        self.sorted().to_vec()
    }

    /// Map from time to value; a later entry wins over an earlier one with the
    /// same timestamp.
    #[must_use]
    pub fn value_as_map(&self) -> BTreeMap<Timestamp, T> {
        self.sorted()
            .iter()
            .map(|v| (v.time(), v.value().clone()))
            .collect()
    }

    /* ---------------- point reads ---------------- */

    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn first_time(&self) -> Result<Timestamp> {
        self.sorted()
            .first()
            .map(TimestampedValue::time)
            .ok_or_else(|| self.empty_error())
    }

    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn last_time(&self) -> Result<Timestamp> {
        self.sorted()
            .last()
            .map(TimestampedValue::time)
            .ok_or_else(|| self.empty_error())
    }

    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn first_value(&self) -> Result<T> {
        self.sorted()
            .first()
            .map(|v| v.value().clone())
            .ok_or_else(|| self.empty_error())
    }

    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn last_value(&self) -> Result<T> {
        self.sorted()
            .last()
            .map(|v| v.value().clone())
            .ok_or_else(|| self.empty_error())
    }

    /// The value in force when `roi` begins; the plain first value when the
    /// ROI is a sentinel.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn first_value_in(&self, roi: &TimeROI) -> Result<T> {
        match roi.first_time() {
            Some(t) => self.get_single_value(t),
            None => self.first_value(),
        }
    }

    /// The value in force just before `roi` ends: the latest entry strictly
    /// before the exclusive end, clamped to the first entry. The plain last
    /// value when the ROI is a sentinel.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn last_value_in(&self, roi: &TimeROI) -> Result<T> {
        let Some(stop) = roi.last_time() else {
            return self.last_value();
        };
        let values = self.sorted();
        if values.is_empty() {
            return Err(self.empty_error());
        }
        let index = lower_bound(&values, stop).saturating_sub(1);
        Ok(values[index].value().clone())
    }

    /// The `n`-th value in time order; `n` past the end clamps to the last.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn nth_value(&self, n: usize) -> Result<T> {
        let values = self.sorted();
        let last = values.len().checked_sub(1).ok_or_else(|| self.empty_error())?;
        Ok(values[n.min(last)].value().clone())
    }

    /// The `n`-th time in order; `n` past the end clamps to the last.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn nth_time(&self, n: usize) -> Result<Timestamp> {
        let values = self.sorted();
        let last = values.len().checked_sub(1).ok_or_else(|| self.empty_error())?;
        Ok(values[n.min(last)].time())
    }

    /// The span during which the `n`-th value is in force.
    ///
    /// The final entry's span ends at the fake end time (see
    /// [`TimeSeries::fake_end_time`]). `n` past the end clamps to the last.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn nth_interval(&self, n: usize) -> Result<TimeInterval> {
        let values = self.sorted();
        let last = values.len().checked_sub(1).ok_or_else(|| self.empty_error())?;
        let n = n.min(last);
        let stop = if n < last {
            values[n + 1].time()
        } else {
            fake_end(&values)
        };
        Ok(TimeInterval::new(values[n].time(), stop))
    }

    /// `last + (last - previous distinct time)`.
    ///
    /// When every entry shares one timestamp (a single entry included) there
    /// is no previous distinct time and the last interval has zero length.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn fake_end_time(&self) -> Result<Timestamp> {
        let values = self.sorted();
        if values.is_empty() {
            return Err(self.empty_error());
        }
        Ok(fake_end(&values))
    }

    /// The value in force at `t`: the latest entry with `time <= t`, clamped
    /// to the first value before the series starts.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn get_single_value(&self, t: Timestamp) -> Result<T> {
        self.get_single_value_with_index(t).map(|(v, _)| v)
    }

    /// [`TimeSeries::get_single_value`] plus the index of the entry used.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn get_single_value_with_index(&self, t: Timestamp) -> Result<(T, usize)> {
        let values = self.sorted();
        if values.is_empty() {
            return Err(self.empty_error());
        }
        let index = index_in_force(&values, t).unwrap_or(0);
        Ok((values[index].value().clone(), index))
    }

    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn min_value(&self) -> Result<T> {
        self.extreme(Ordering::Less)
    }

    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn max_value(&self) -> Result<T> {
        self.extreme(Ordering::Greater)
    }

    // NaN never replaces the running extreme; a leading NaN is replaced by
    // the next value.
    fn extreme(&self, wanted: Ordering) -> Result<T> {
        let values = self.values.borrow();
        let mut iter = values.iter().map(TimestampedValue::value);
        let mut best = iter.next().ok_or_else(|| self.empty_error())?;
        for v in iter {
            let best_is_nan = best.partial_cmp(best).is_none();
            if best_is_nan || v.partial_cmp(best) == Some(wanted) {
                best = v;
            }
        }
        Ok(best.clone())
    }
}

pub(crate) fn fake_end<T>(values: &[TimestampedValue<T>]) -> Timestamp {
    last_step(values.iter().rev().map(TimestampedValue::time))
        .map_or(Timestamp::MIN, |(last, step)| last.offset_nanos(step))
}

impl<T: LogValue> fmt::Display for TimeSeries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.sorted().iter() {
            writeln!(f, "{}  {}", entry.time(), entry.value())?;
        }
        Ok(())
    }
}
