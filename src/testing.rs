//! Testing utilities for code built on ironlog.
//!
//! This module provides helpers for writing idiomatic tests against series,
//! interval sets and ROIs. It includes:
//!
//! - **Assertions**: tolerant float comparison and readable series/interval diffs
//! - **Test data builders**: build series and interval sets from seconds offsets
//! - **Fixtures**: pre-built logs used throughout the crate's own tests
//!
//! # Quick Start
//!
//! ```
//! use ironlog::testing::*;
//!
//! let log = SeriesBuilder::<f64>::new("temp")
//!     .starting_at(ts("2007-11-30T16:17:00"))
//!     .point(0.0, 1.0)
//!     .point(10.0, 3.0)
//!     .build();
//!
//! assert_close(log.time_average_value(None).unwrap(), 2.0, 1e-12);
//! ```
//!
//! # Assertion Functions
//!
//! - [`assert_close`]: float comparison with an absolute tolerance
//! - [`assert_series_eq`]: compare a series with expected `(time, value)` pairs
//! - [`assert_intervals_eq`]: compare an interval set with expected triples
//!
//! # Test Data Builders
//!
//! [`SeriesBuilder`] and [`IntervalSetBuilder`] take offsets in seconds from a
//! base time, which keeps test tables short:
//!
//! ```
//! use ironlog::testing::*;
//!
//! let splitter = IntervalSetBuilder::new()
//!     .starting_at(ts("2007-11-30T16:17:00"))
//!     .interval(0.0, 60.0, 0)
//!     .interval(60.0, 120.0, 1)
//!     .build();
//! assert!(splitter.is_splitter());
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
