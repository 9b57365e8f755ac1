//! Routing entries of one series into several destination series.
//!
//! ## Provided methods
//! - [`TimeSeries::split_by_time`] -- route by a [`SplitIntervalSet`]
//! - [`TimeSeries::split_by_time_vector`] -- route by sorted boundaries plus one
//!   destination per gap
//!
//! Both validate every argument before the first output is touched. Negative
//! destinations mean "unassigned" and are skipped.
//!
//! ## Example
//! ```
//! use ironlog::{SplitInterval, SplitIntervalSet, TimeSeries, Timestamp};
//!
//! let s = |x: f64| Timestamp::from_seconds(x);
//! let mut log = TimeSeries::new("temp");
//! for i in 0..6 {
//!     log.add_value(s(f64::from(i) * 10.0), i);
//! }
//! let splitter: SplitIntervalSet = vec![
//!     SplitInterval::new(s(0.0), s(25.0), 0),
//!     SplitInterval::new(s(25.0), s(60.0), 1),
//! ]
//! .into();
//! let mut outputs = vec![TimeSeries::new("a"), TimeSeries::new("b")];
//! log.split_by_time(&splitter, &mut outputs, false)?;
//! assert_eq!(outputs[0].values_as_vector(), vec![0, 1, 2]);
//! assert_eq!(outputs[1].values_as_vector(), vec![3, 4, 5]);
//! # Ok::<(), ironlog::LogError>(())
//! ```

use crate::error::{LogError, Result};
use crate::interval::{SplitInterval, SplitIntervalSet};
use crate::series::TimeSeries;
use crate::time::{Timestamp, TimestampedValue};
use crate::utils::lower_bound;
use crate::value::LogValue;
use log::{debug, trace};
use std::collections::BTreeMap;

/// `Ok(None)` for an unassigned (negative) destination.
fn output_index(destination: i32, outputs: usize) -> Result<Option<usize>> {
    let Ok(index) = usize::try_from(destination) else {
        return Ok(None);
    };
    if index >= outputs {
        return Err(LogError::IndexOutOfRange { index, len: outputs });
    }
    Ok(Some(index))
}

fn append<T: LogValue>(output: &mut TimeSeries<T>, entries: &[TimestampedValue<T>]) {
    for entry in entries {
        output.add_value(entry.time(), entry.value().clone());
    }
}

impl<T: LogValue> TimeSeries<T> {
    /// Append a copy of every entry with time in `[start, stop)` of each
    /// interval to `outputs[destination]`.
    ///
    /// ### Arguments
    /// - `splitter`: intervals in any order; degenerate ones route nothing.
    /// - `outputs`: one series per destination index.
    /// - `tolerate_overlap`: allow same-destination intervals to overlap, in
    ///   which case an entry may be appended to the same output twice.
    ///
    /// # Errors
    /// - [`LogError::IndexOutOfRange`] for a destination `>= outputs.len()`
    /// - [`LogError::OverlappingIntervals`] for overlapping same-destination
    ///   intervals when `tolerate_overlap` is false
    pub fn split_by_time(
        &self,
        splitter: &SplitIntervalSet,
        outputs: &mut [TimeSeries<T>],
        tolerate_overlap: bool,
    ) -> Result<()> {
        let mut by_destination: BTreeMap<usize, Vec<SplitInterval>> = BTreeMap::new();
        for interval in splitter {
            if let Some(index) = output_index(interval.destination(), outputs.len())? {
                by_destination.entry(index).or_default().push(*interval);
            }
        }
        if !tolerate_overlap {
            for intervals in by_destination.values_mut() {
                intervals.retain(SplitInterval::is_valid);
                intervals.sort_by_key(SplitInterval::start);
                if let Some(w) = intervals.windows(2).find(|w| w[0].overlaps(&w[1])) {
                    return Err(LogError::OverlappingIntervals(w[0].destination()));
                }
            }
        }

        let values = self.sorted();
        let mut routed = 0usize;
        for interval in splitter {
            let Some(index) = output_index(interval.destination(), outputs.len())? else {
                trace!("skipping unassigned interval {interval}");
                continue;
            };
            if !interval.is_valid() {
                continue;
            }
            let lo = lower_bound(&values, interval.start());
            let hi = lo + lower_bound(&values[lo..], interval.stop());
            append(&mut outputs[index], &values[lo..hi]);
            routed += hi - lo;
        }
        debug!(
            "split '{}': routed {routed} of {} values into {} outputs",
            self.name(),
            values.len(),
            outputs.len()
        );
        Ok(())
    }

    /// Route by boundary list: `destinations[i]` receives every entry with
    /// time in `[boundaries[i], boundaries[i + 1])`.
    ///
    /// Single forward pass over entries and boundaries. A log ending before
    /// the first boundary, or starting at or after the last, routes nothing.
    ///
    /// # Errors
    /// - [`LogError::LengthMismatch`] unless `boundaries.len() == destinations.len() + 1`
    /// - [`LogError::InvalidRange`] when the boundaries are not strictly increasing
    /// - [`LogError::IndexOutOfRange`] for a destination `>= outputs.len()`
    pub fn split_by_time_vector(
        &self,
        boundaries: &[Timestamp],
        destinations: &[i32],
        outputs: &mut [TimeSeries<T>],
    ) -> Result<()> {
        if boundaries.len() != destinations.len() + 1 {
            return Err(LogError::LengthMismatch {
                expected: destinations.len() + 1,
                found: boundaries.len(),
            });
        }
        if let Some(w) = boundaries.windows(2).find(|w| w[0] >= w[1]) {
            return Err(LogError::InvalidRange(format!(
                "split boundaries must increase strictly: {} then {}",
                w[0], w[1]
            )));
        }
        let targets = destinations
            .iter()
            .map(|d| output_index(*d, outputs.len()))
            .collect::<Result<Vec<_>>>()?;

        let values = self.sorted();
        let (Some(first), Some(last)) = (values.first(), values.last()) else {
            return Ok(());
        };
        let (Some(&lowest), Some(&highest)) = (boundaries.first(), boundaries.last()) else {
            return Ok(());
        };
        if last.time() < lowest || first.time() >= highest {
            debug!("split '{}': log lies outside every boundary", self.name());
            return Ok(());
        }

        let mut cursor = lower_bound(&values, lowest);
        let mut routed = 0usize;
        for (target, stop) in targets.iter().zip(&boundaries[1..]) {
            let start = cursor;
            while cursor < values.len() && values[cursor].time() < *stop {
                cursor += 1;
            }
            if let Some(index) = target {
                append(&mut outputs[*index], &values[start..cursor]);
                routed += cursor - start;
            }
            if cursor == values.len() {
                break;
            }
        }
        debug!(
            "split '{}': routed {routed} of {} values over {} boundaries",
            self.name(),
            values.len(),
            boundaries.len()
        );
        Ok(())
    }
}
