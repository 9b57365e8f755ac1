//! Test data builders for creating series and interval sets fluently.

use crate::interval::{SplitInterval, SplitIntervalSet};
use crate::series::TimeSeries;
use crate::time::Timestamp;
use crate::value::LogValue;

/// A fluent builder for a [`TimeSeries`] whose times are given as seconds
/// after a base time (the epoch unless [`SeriesBuilder::starting_at`] is used).
///
/// Entries are appended in the order given, so out-of-order points exercise
/// the lazy sort.
///
/// # Example
///
/// ```
/// use ironlog::testing::SeriesBuilder;
///
/// let s = SeriesBuilder::new("x")
///     .points(&[(0.0, 1), (30.0, 2)])
///     .every(10.0, &[5, 6])
///     .build();
/// assert_eq!(s.size(), 4);
/// ```
pub struct SeriesBuilder<T> {
    name: String,
    base: Timestamp,
    entries: Vec<(Timestamp, T)>,
}

impl<T: LogValue> SeriesBuilder<T> {
    /// Create an empty builder for a series called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: Timestamp::EPOCH,
            entries: Vec::new(),
        }
    }

    /// Offsets given after this call are relative to `base`.
    #[must_use]
    pub const fn starting_at(mut self, base: Timestamp) -> Self {
        self.base = base;
        self
    }

    /// Add one entry `seconds` after the base time.
    #[must_use]
    pub fn point(mut self, seconds: f64, value: T) -> Self {
        self.entries.push((self.base.offset_seconds(seconds), value));
        self
    }

    /// Add several `(seconds, value)` entries.
    #[must_use]
    pub fn points(mut self, points: &[(f64, T)]) -> Self {
        for (seconds, value) in points {
            self.entries.push((self.base.offset_seconds(*seconds), value.clone()));
        }
        self
    }

    /// Add `values` evenly spaced `step` seconds apart, continuing one step
    /// after the latest entry so far (or at the base time when empty).
    #[must_use]
    pub fn every(mut self, step: f64, values: &[T]) -> Self {
        let start = self
            .entries
            .iter()
            .map(|(t, _)| *t)
            .max()
            .map_or(self.base, |t| t.offset_seconds(step));
        for (i, value) in values.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let offset = step * i as f64;
            self.entries.push((start.offset_seconds(offset), value.clone()));
        }
        self
    }

    /// Build the series.
    #[must_use]
    pub fn build(self) -> TimeSeries<T> {
        let mut series = TimeSeries::new(self.name);
        for (time, value) in self.entries {
            series.add_value(time, value);
        }
        series
    }
}

/// A fluent builder for [`SplitIntervalSet`]s with second offsets.
///
/// # Example
///
/// ```
/// use ironlog::testing::IntervalSetBuilder;
///
/// let filter = IntervalSetBuilder::new()
///     .interval(0.0, 10.0, 0)
///     .interval(20.0, 30.0, 0)
///     .build();
/// assert!(filter.is_filter());
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Default)]
pub struct IntervalSetBuilder {
    base: Timestamp,
    intervals: Vec<SplitInterval>,
}

impl IntervalSetBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { base: Timestamp::EPOCH, intervals: Vec::new() }
    }

    #[must_use]
    pub const fn starting_at(mut self, base: Timestamp) -> Self {
        self.base = base;
        self
    }

    /// Add `[start, stop)` seconds after the base time, routed to `destination`.
    #[must_use]
    pub fn interval(mut self, start: f64, stop: f64, destination: i32) -> Self {
        self.intervals.push(SplitInterval::new(
            self.base.offset_seconds(start),
            self.base.offset_seconds(stop),
            destination,
        ));
        self
    }

    #[must_use]
    pub fn build(self) -> SplitIntervalSet {
        self.intervals.into()
    }
}
