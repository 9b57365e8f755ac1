//! # Ironlog
//!
//! A **time-indexed value store** for instrument logs sampled at irregular
//! times. Ironlog records `(time, value)` pairs, masks out invalid time
//! regions, splits logs into destination buckets by time, and computes
//! time-weighted statistics.
//!
//! ## Key Features
//!
//! - **Lazily sorted logs** - appends are O(1); order is resolved on first read
//! - **Filtered views** - hide excluded time regions without copying data
//! - **Interval algebra** - AND / OR / NOT / PLUS over destination-tagged intervals
//! - **Regions of interest** - canonical disjoint time ranges with union and intersection
//! - **Splitting** - route entries into per-destination logs by interval set or boundary list
//! - **Time-weighted statistics** - means and spreads weighted by how long each value held
//! - **Type-safe** - numeric-only operations report unsupported value types as errors
//!
//! ## Quick Start
//!
//! ```
//! use ironlog::*;
//! # fn main() -> Result<()> {
//! let t0: Timestamp = "2007-11-30T16:17:00".parse()?;
//!
//! let mut log = TimeSeries::new("temperature");
//! for (i, v) in (0u32..).zip([9.99, 7.55, 5.55, 10.55]) {
//!     log.add_value(t0.offset_seconds(10.0 * f64::from(i)), v);
//! }
//!
//! // Keep two 10 s windows and average over them.
//! let mut roi = TimeROI::new(t0.offset_seconds(5.0), t0.offset_seconds(15.0));
//! roi.add_roi(t0.offset_seconds(25.0), t0.offset_seconds(35.0));
//! let mean = log.time_average_value(Some(&roi))?;
//! assert!((mean - (9.99 + 7.55 + 5.55 + 10.55) / 4.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### TimeSeries
//!
//! A [`TimeSeries<T>`] is an appendable log of [`TimestampedValue`]s for one
//! quantity. The value `v_i` is *in force* from `t_i` until the next entry;
//! the last entry is in force until the **fake end time**
//! `t_last + (t_last - t_previous_distinct)`.
//!
//! ### Intervals and ROIs
//!
//! - [`SplitInterval`] / [`SplitIntervalSet`] - `[start, stop)` ranges tagged
//!   with a destination; a set is a *filter* when every destination is `<= 0`
//!   and a *splitter* otherwise
//! - [`TimeROI`] - a canonical set of disjoint included regions, with the
//!   "use all" and "use none" sentinels
//! - [`time_rois_from_splitters`] - one ROI per destination
//!
//! ### Filtering and splitting
//!
//! - [`FilteredTimeSeries`] - a log seen through a boolean mask or ROI
//! - [`TimeSeries::split_by_time`] / [`TimeSeries::split_by_time_vector`] -
//!   route entries into one output log per destination
//!
//! ### Value types
//!
//! Series are generic over [`LogValue`], implemented for `i32`, `i64`, `u32`,
//! `u64`, `f32`, `f64`, `bool` and `String`. [`AnyTimeSeries`] holds any of
//! them behind one type.
//!
//! ## Logging
//!
//! Ironlog emits records through the [`log`] facade (`debug` for filter and
//! split summaries, `trace` for skipped destinations, `warn` for empty masks)
//! and never installs a logger itself.
//!
//! ## Module Overview
//!
//! - [`time`] - timestamps, timestamped values and plain time intervals
//! - [`series`] - the `TimeSeries` container and its lazy sort
//! - [`helpers`] - statistics, value filters, ROI trimming and splitting
//! - [`interval`] - split intervals and their set algebra
//! - [`roi`] - regions of interest
//! - [`filtered`] - filtered views with a region quick-reference table
//! - [`any`] - the closed sum over value types
//! - [`testing`] - assertions, builders and fixtures for tests

pub mod any;
pub mod error;
pub mod filtered;
pub mod helpers;
pub mod interval;
pub mod roi;
pub mod series;
pub mod testing;
pub mod time;
pub mod value;

mod utils;

// General re-exports
pub use any::AnyTimeSeries;
pub use error::{LogError, Result};
pub use filtered::{FilteredTimeSeries, Region};
pub use helpers::*;
pub use interval::{SplitInterval, SplitIntervalSet, time_rois_from_splitters};
pub use roi::TimeROI;
pub use series::{SortState, TimeSeries};
pub use time::{TimeInterval, Timestamp, TimestampedValue};
pub use value::LogValue;
