//! Numeric summaries of a series: derivative, time-weighted averages and the
//! [`Statistics`] block.
//!
//! ## Provided methods
//! - [`TimeSeries::get_derivative`] -- finite differences at pair midpoints
//! - [`TimeSeries::time_average_value`] -- time-weighted mean, optionally in an ROI
//! - [`TimeSeries::time_average_value_and_std_dev`] -- mean plus weighted spread
//! - [`TimeSeries::average_value_in_intervals`] -- time-weighted mean over explicit intervals
//! - [`TimeSeries::duration_in_seconds`] -- total time covered by the log
//! - [`TimeSeries::statistics`] / [`TimeSeries::extract_statistic`]
//!
//! Every value is held until the next entry: the segment `[t_i, t_{i+1})`
//! carries `v_i`, and the final entry runs to the fake end time.
//!
//! ## Example
//! ```
//! use ironlog::{TimeSeries, Timestamp};
//!
//! let mut log = TimeSeries::new("current");
//! for (i, v) in [2.0, 4.0, 6.0].into_iter().enumerate() {
//!     log.add_value(Timestamp::from_seconds(i as f64 * 10.0), v);
//! }
//! // Evenly spaced, single-sampled: the time average is the plain mean.
//! assert!((log.time_average_value(None)? - 4.0).abs() < 1e-12);
//! # Ok::<(), ironlog::LogError>(())
//! ```

use crate::error::{LogError, Result};
use crate::roi::TimeROI;
use crate::series::{TimeSeries, fake_end};
use crate::time::{TimeInterval, Timestamp, TimestampedValue};
use crate::utils::index_in_force;
use crate::value::LogValue;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Summary statistics of a numeric series.
///
/// `minimum` through `standard_deviation` are over the sample values (the
/// standard deviation is the population one); `time_mean` and
/// `time_standard_deviation` weight each value by how long it was in force.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub minimum: f64,
    pub maximum: f64,
    pub mean: f64,
    pub median: f64,
    pub standard_deviation: f64,
    pub time_mean: f64,
    pub time_standard_deviation: f64,
    pub duration: f64,
}

impl Statistics {
    /// Every field `NaN`; the summary of an empty selection.
    #[must_use]
    pub const fn nan() -> Self {
        Self {
            minimum: f64::NAN,
            maximum: f64::NAN,
            mean: f64::NAN,
            median: f64::NAN,
            standard_deviation: f64::NAN,
            time_mean: f64::NAN,
            time_standard_deviation: f64::NAN,
            duration: f64::NAN,
        }
    }
}

/// One field of [`Statistics`], or the first/last value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatisticType {
    FirstValue,
    LastValue,
    Minimum,
    Maximum,
    Mean,
    Median,
    StandardDeviation,
    TimeAveragedMean,
    TimeAveragedStdDev,
    Duration,
}

impl<T: LogValue> TimeSeries<T> {
    /// Fail with [`LogError::UnsupportedType`] unless `T` is numeric.
    pub(crate) fn require_numeric(&self, operation: &'static str) -> Result<()> {
        if T::is_numeric() {
            Ok(())
        } else {
            Err(LogError::UnsupportedType { operation, type_name: T::TYPE_NAME })
        }
    }

    /// Rate of change between consecutive entries.
    ///
    /// Each output entry sits at the midpoint of its pair and holds
    /// `(v[i+1] - v[i]) / seconds(t[i+1] - t[i])`. Pairs sharing a timestamp
    /// are skipped. The result is named `<name>_derivative`.
    ///
    /// # Errors
    /// - [`LogError::UnsupportedType`] for text series
    /// - [`LogError::EmptySeries`] for an empty series
    /// - [`LogError::InsufficientData`] for a single entry
    pub fn get_derivative(&self) -> Result<TimeSeries<f64>> {
        self.require_numeric("derivative")?;
        let values = self.sorted();
        match values.len() {
            0 => return Err(self.empty_error()),
            1 => {
                return Err(LogError::InsufficientData {
                    name: self.name().to_string(),
                    required: 2,
                    found: 1,
                });
            }
            _ => {}
        }

        let mut out = TimeSeries::new(format!("{}_derivative", self.name()));
        for pair in values.windows(2) {
            let (t0, t1) = (pair[0].time(), pair[1].time());
            if t0 == t1 {
                continue;
            }
            let dv = numeric(&pair[1]) - numeric(&pair[0]);
            let midpoint = t0.offset_nanos(t1.nanos_since(t0) / 2);
            out.add_value(midpoint, dv / t1.seconds_since(t0));
        }
        Ok(out)
    }

    /// Time-weighted mean of the values in force during `intervals`.
    ///
    /// - empty series or no intervals: `NaN`
    /// - a single entry: that entry's value
    /// - intervals of zero total length: the arithmetic mean of all values
    ///
    /// # Errors
    /// [`LogError::UnsupportedType`] for text series.
    pub fn average_value_in_intervals(&self, intervals: &[TimeInterval]) -> Result<f64> {
        self.require_numeric("time average")?;
        let values = self.sorted();
        Ok(weighted_mean(&values, intervals))
    }

    /// Time-weighted mean over the whole log, or over `roi` when given.
    ///
    /// Without an ROI (or with [`TimeROI::use_all`]) the log spans
    /// `[first_time, fake_end)`; [`TimeROI::use_none`] gives `NaN`.
    ///
    /// # Errors
    /// [`LogError::UnsupportedType`] for text series.
    pub fn time_average_value(&self, roi: Option<&TimeROI>) -> Result<f64> {
        self.require_numeric("time average")?;
        let values = self.sorted();
        Ok(weighted_mean(&values, &averaging_intervals(&values, roi)))
    }

    /// [`TimeSeries::time_average_value`] plus the time-weighted standard
    /// deviation `sqrt(sum(d_i * (v_i - mean)^2) / sum(d_i))`.
    ///
    /// # Errors
    /// [`LogError::UnsupportedType`] for text series.
    pub fn time_average_value_and_std_dev(&self, roi: Option<&TimeROI>) -> Result<(f64, f64)> {
        self.require_numeric("time average")?;
        let values = self.sorted();
        let intervals = averaging_intervals(&values, roi);
        if values.is_empty() || intervals.is_empty() {
            return Ok((f64::NAN, f64::NAN));
        }
        if values.len() == 1 {
            return Ok((numeric(&values[0]), 0.0));
        }

        let (sum, total) = weighted_sums(&values, &intervals, |v| v);
        if total <= 0.0 {
            let samples: Vec<f64> = values.iter().map(numeric).collect();
            let mean = arithmetic_mean(&samples);
            return Ok((mean, population_std_dev(&samples, mean)));
        }
        let mean = sum / total;
        let (spread, _) = weighted_sums(&values, &intervals, |v| (v - mean).powi(2));
        Ok((mean, (spread / total).sqrt()))
    }

    /// Seconds covered by the log.
    ///
    /// Without an ROI this is the sum of every [`TimeSeries::nth_interval`]
    /// (the last one ending at the fake end time). With an ROI it is the ROI's
    /// duration once everything before the first entry is masked out.
    ///
    /// # Errors
    /// [`LogError::EmptySeries`].
    pub fn duration_in_seconds(&self, roi: Option<&TimeROI>) -> Result<f64> {
        let values = self.sorted();
        let first = values.first().map(TimestampedValue::time).ok_or_else(|| self.empty_error())?;
        match roi {
            Some(roi) if !roi.is_use_all() => {
                let mut clipped = roi.clone();
                clipped.add_mask(Timestamp::MIN, first);
                Ok(clipped.duration_in_seconds())
            }
            _ => Ok(fake_end(&values).seconds_since(first)),
        }
    }

    /// Summary statistics over the values selected by `roi` (all values
    /// without one). An empty selection yields [`Statistics::nan`].
    ///
    /// # Errors
    /// [`LogError::UnsupportedType`] for text series.
    pub fn statistics(&self, roi: Option<&TimeROI>) -> Result<Statistics> {
        self.require_numeric("statistics")?;
        let samples: Vec<f64> = match roi {
            Some(roi) if !roi.is_use_all() => self
                .filtered_values_as_vector(roi)
                .iter()
                .filter_map(|v| v.to_f64())
                .collect(),
            _ => self.sorted().iter().map(numeric).collect(),
        };
        if samples.is_empty() {
            return Ok(Statistics::nan());
        }

        let mean = arithmetic_mean(&samples);
        let (time_mean, time_standard_deviation) = self.time_average_value_and_std_dev(roi)?;
        Ok(Statistics {
            minimum: samples.iter().copied().fold(f64::NAN, f64::min),
            maximum: samples.iter().copied().fold(f64::NAN, f64::max),
            mean,
            median: median(&samples),
            standard_deviation: population_std_dev(&samples, mean),
            time_mean,
            time_standard_deviation,
            duration: self.duration_in_seconds(roi)?,
        })
    }

    /// A single statistic.
    ///
    /// # Errors
    /// [`LogError::UnsupportedType`] for text series; [`LogError::EmptySeries`]
    /// for the first/last value of an empty series.
    pub fn extract_statistic(&self, kind: StatisticType, roi: Option<&TimeROI>) -> Result<f64> {
        self.require_numeric("statistics")?;
        let stats = || self.statistics(roi);
        let all = TimeROI::use_all();
        let roi_or_all = roi.unwrap_or(&all);
        Ok(match kind {
            StatisticType::FirstValue => self.first_value_in(roi_or_all)?.to_f64().unwrap_or(f64::NAN),
            StatisticType::LastValue => self.last_value_in(roi_or_all)?.to_f64().unwrap_or(f64::NAN),
            StatisticType::Minimum => stats()?.minimum,
            StatisticType::Maximum => stats()?.maximum,
            StatisticType::Mean => stats()?.mean,
            StatisticType::Median => stats()?.median,
            StatisticType::StandardDeviation => stats()?.standard_deviation,
            StatisticType::TimeAveragedMean => self.time_average_value(roi)?,
            StatisticType::TimeAveragedStdDev => self.time_average_value_and_std_dev(roi)?.1,
            StatisticType::Duration => self.duration_in_seconds(roi)?,
        })
    }
}

/* ---------------- kernels ---------------- */

#[inline]
fn numeric<T: LogValue>(entry: &TimestampedValue<T>) -> f64 {
    entry.value().to_f64().unwrap_or(f64::NAN)
}

fn averaging_intervals<T>(values: &[TimestampedValue<T>], roi: Option<&TimeROI>) -> Vec<TimeInterval> {
    match (roi, values.first()) {
        (_, None) => Vec::new(),
        (Some(roi), _) if !roi.is_use_all() => roi.to_time_intervals(),
        (_, Some(first)) => vec![TimeInterval::new(first.time(), fake_end(values))],
    }
}

fn weighted_mean<T: LogValue>(values: &[TimestampedValue<T>], intervals: &[TimeInterval]) -> f64 {
    if values.is_empty() || intervals.is_empty() {
        return f64::NAN;
    }
    if values.len() == 1 {
        return numeric(&values[0]);
    }
    let (sum, total) = weighted_sums(values, intervals, |v| v);
    if total > 0.0 {
        sum / total
    } else {
        arithmetic_mean(&values.iter().map(numeric).collect::<Vec<_>>())
    }
}

/// `(sum(d * f(v)), sum(d))` over every segment of every interval.
///
/// Each interval starts with the value in force at its start (the first value
/// when it starts before the log), walks the entries strictly inside it and
/// closes with the last value seen.
fn weighted_sums<T: LogValue>(
    values: &[TimestampedValue<T>],
    intervals: &[TimeInterval],
    f: impl Fn(f64) -> f64,
) -> (f64, f64) {
    let mut sum = 0.0;
    let mut total = 0.0;
    for interval in intervals.iter().filter(|i| i.is_valid()) {
        let mut index = index_in_force(values, interval.start).unwrap_or(0);
        let mut segment_start = interval.start;
        loop {
            let segment_stop = match values.get(index + 1) {
                Some(next) if next.time() < interval.stop => next.time(),
                _ => interval.stop,
            };
            let duration = segment_stop.seconds_since(segment_start);
            if duration > 0.0 {
                sum += duration * f(numeric(&values[index]));
                total += duration;
            }
            if segment_stop == interval.stop {
                break;
            }
            index += 1;
            segment_start = segment_stop;
        }
    }
    (sum, total)
}

#[allow(clippy::cast_precision_loss)]
fn arithmetic_mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

#[allow(clippy::cast_precision_loss)]
fn population_std_dev(samples: &[f64], mean: f64) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples.len() as f64).sqrt()
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted: Vec<OrderedFloat<f64>> = samples.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => f64::NAN,
        n if n % 2 == 1 => sorted[mid].0,
        _ => (sorted[mid - 1].0 + sorted[mid].0) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_nanos(secs * 1_000_000_000)
    }

    #[test]
    fn median_of_even_count_averages_middle_pair() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[5.0]), 5.0);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn weighted_sums_clamp_before_first_entry() {
        let values = vec![TimestampedValue::new(t(10), 2.0), TimestampedValue::new(t(20), 4.0)];
        let (sum, total) = weighted_sums(&values, &[TimeInterval::new(t(0), t(30))], |v| v);
        assert_eq!(total, 30.0);
        assert_eq!(sum, 20.0 * 2.0 + 10.0 * 4.0);
    }

    #[test]
    fn identical_times_fall_back_to_arithmetic_mean() {
        let mut s = TimeSeries::new("x");
        s.add_values(&[t(5), t(5)], &[1.0, 3.0]).unwrap();
        assert_eq!(s.time_average_value(None).unwrap(), 2.0);
    }
}
