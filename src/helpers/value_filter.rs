//! Value-range filters and time histograms.
//!
//! A [`ValueFilter`] selects the time regions where a numeric log stays
//! within `[min, max]`. The result comes out either as a filter-style
//! [`SplitIntervalSet`] (every destination `0`) or as a [`TimeROI`].
//!
//! ## Example
//! ```
//! use ironlog::{TimeSeries, Timestamp, ValueFilter};
//!
//! let mut log = TimeSeries::new("power");
//! for (s, v) in [(0.0, 1.0), (10.0, 5.0), (20.0, 6.0), (30.0, 1.0)] {
//!     log.add_value(Timestamp::from_seconds(s), v);
//! }
//! let roi = log.make_roi_by_value(&ValueFilter::new().with_min(4.0))?;
//! assert_eq!(roi.number_of_regions(), 1);
//! assert_eq!(roi.duration_in_seconds(), 20.0);
//! # Ok::<(), ironlog::LogError>(())
//! ```

use crate::error::{LogError, Result};
use crate::interval::{SplitInterval, SplitIntervalSet};
use crate::roi::TimeROI;
use crate::series::TimeSeries;
use crate::time::Timestamp;
use crate::value::LogValue;
use serde::{Deserialize, Serialize};

/// Parameters for [`TimeSeries::make_filter_by_value`].
///
/// Unset bounds default to the series minimum/maximum. `time_tolerance` is in
/// seconds; with `centre` set it widens each region on both sides, otherwise
/// it only extends a region that is still open when the log ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub time_tolerance: f64,
    pub centre: bool,
}

impl ValueFilter {
    #[must_use]
    pub const fn new() -> Self {
        Self { min: None, max: None, time_tolerance: 0.0, centre: false }
    }

    #[must_use]
    pub const fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub const fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub const fn with_time_tolerance(mut self, seconds: f64) -> Self {
        self.time_tolerance = seconds;
        self
    }

    #[must_use]
    pub const fn with_centre(mut self, centre: bool) -> Self {
        self.centre = centre;
        self
    }
}

impl<T: LogValue> TimeSeries<T> {
    /// Regions where `min <= value <= max`, as a merged filter.
    ///
    /// A region opens at the first good entry (minus the tolerance when
    /// centred) and closes at the first bad entry, or at the last good entry
    /// plus the tolerance when centred. A log that ends good closes at
    /// `last + tolerance`. `NaN` values are never good.
    ///
    /// ### Returns
    /// A filter-style set (all destinations `0`); empty for an empty log.
    ///
    /// # Errors
    /// - [`LogError::UnsupportedType`] for text series
    /// - [`LogError::InvalidRange`] when `min > max`
    pub fn make_filter_by_value(&self, filter: &ValueFilter) -> Result<SplitIntervalSet> {
        self.require_numeric("filter by value")?;
        if self.is_empty() {
            return Ok(SplitIntervalSet::new());
        }
        let min = match filter.min {
            Some(min) => min,
            None => self.min_value()?.to_f64().unwrap_or(f64::NEG_INFINITY),
        };
        let max = match filter.max {
            Some(max) => max,
            None => self.max_value()?.to_f64().unwrap_or(f64::INFINITY),
        };
        if min > max {
            return Err(LogError::InvalidRange(format!(
                "minimum {min} is above maximum {max}"
            )));
        }

        let tol = filter.time_tolerance;
        let widen = |t: Timestamp, sign: f64| {
            if filter.centre { t.offset_seconds(sign * tol) } else { t }
        };

        let values = self.sorted();
        let mut out = SplitIntervalSet::new();
        let mut open: Option<Timestamp> = None;
        let mut last_good = Timestamp::MIN;
        for entry in values.iter() {
            let v = entry.value().to_f64().unwrap_or(f64::NAN);
            let good = min <= v && v <= max;
            match (good, open) {
                (true, None) => {
                    open = Some(widen(entry.time(), -1.0));
                    last_good = entry.time();
                }
                (true, Some(_)) => last_good = entry.time(),
                (false, Some(start)) => {
                    let stop = if filter.centre { widen(last_good, 1.0) } else { entry.time() };
                    out.push(SplitInterval::new(start, stop, 0));
                    open = None;
                }
                (false, None) => {}
            }
        }
        if let Some(start) = open {
            let last = values.last().map_or(last_good, |e| e.time());
            out.push(SplitInterval::new(start, last.offset_seconds(tol), 0));
        }
        Ok(out.remove_overlap())
    }

    /// [`TimeSeries::make_filter_by_value`] as a [`TimeROI`];
    /// [`TimeROI::use_none`] when no region qualifies.
    ///
    /// # Errors
    /// Same as [`TimeSeries::make_filter_by_value`].
    pub fn make_roi_by_value(&self, filter: &ValueFilter) -> Result<TimeROI> {
        let set = self.make_filter_by_value(filter)?;
        if set.is_empty() {
            return Ok(TimeROI::use_none());
        }
        Ok(TimeROI::from_intervals(set.iter().map(SplitInterval::interval)))
    }

    /// Sum of the values falling in each of `n_bins` equal time bins over
    /// `[t_min, t_max)`.
    ///
    /// # Errors
    /// - [`LogError::UnsupportedType`] for text series
    /// - [`LogError::InvalidRange`] when `t_max <= t_min` or `n_bins == 0`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn histogram_data(&self, t_min: Timestamp, t_max: Timestamp, n_bins: usize) -> Result<Vec<f64>> {
        self.require_numeric("histogram")?;
        if t_max <= t_min {
            return Err(LogError::InvalidRange(format!(
                "histogram range [{t_min}, {t_max}) is empty"
            )));
        }
        if n_bins == 0 {
            return Err(LogError::InvalidRange("histogram needs at least one bin".into()));
        }

        let width = t_max.seconds_since(t_min) / n_bins as f64;
        let mut counts = vec![0.0; n_bins];
        for entry in self.sorted().iter() {
            let t = entry.time();
            if t < t_min || t >= t_max {
                continue;
            }
            let bin = ((t.seconds_since(t_min) / width) as usize).min(n_bins - 1);
            counts[bin] += entry.value().to_f64().unwrap_or(0.0);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(points: &[(f64, f64)]) -> TimeSeries<f64> {
        let mut s = TimeSeries::new("x");
        for &(t, v) in points {
            s.add_value(Timestamp::from_seconds(t), v);
        }
        s
    }

    #[test]
    fn centred_regions_widen_by_tolerance() {
        let s = log(&[(0.0, 0.0), (10.0, 5.0), (20.0, 5.0), (30.0, 0.0)]);
        let f = ValueFilter::new().with_min(1.0).with_time_tolerance(2.0).with_centre(true);
        let set = s.make_filter_by_value(&f).unwrap();
        assert_eq!(set.len(), 1);
        let only = set.get(0).unwrap();
        assert_eq!(only.start(), Timestamp::from_seconds(8.0));
        assert_eq!(only.stop(), Timestamp::from_seconds(22.0));
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let s = log(&[(0.0, 1.0)]);
        let f = ValueFilter::new().with_min(3.0).with_max(2.0);
        assert!(matches!(s.make_filter_by_value(&f), Err(LogError::InvalidRange(_))));
    }

    #[test]
    fn histogram_bins_sum_values() {
        let s = log(&[(0.0, 1.0), (1.0, 2.0), (5.0, 4.0), (10.0, 8.0)]);
        let h = s
            .histogram_data(Timestamp::from_seconds(0.0), Timestamp::from_seconds(10.0), 2)
            .unwrap();
        assert_eq!(h, vec![3.0, 4.0]);
    }
}
