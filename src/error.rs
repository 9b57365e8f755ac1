//! Error taxonomy for series, interval and ROI operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Degenerate
//! geometry (reversed or zero-length intervals) is never reported here: the
//! algebra silently drops such intervals instead.

use crate::time::Timestamp;
use thiserror::Error;

/// Errors raised by the log engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// A read that needs at least one value was issued on an empty series.
    #[error("time series '{0}' has no values")]
    EmptySeries(String),

    /// The operation needs more samples than the series holds.
    #[error("time series '{name}' needs at least {required} values, found {found}")]
    InsufficientData {
        name: String,
        required: usize,
        found: usize,
    },

    /// A numeric-only operation was invoked on a non-numeric value type.
    #[error("{operation} is not supported for {type_name} values")]
    UnsupportedType {
        operation: &'static str,
        type_name: &'static str,
    },

    /// A bound pair or boundary list is not ordered as required.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Two splitters were added together, so the destinations are undefined.
    #[error(
        "cannot combine two splitters: the output destinations would be undefined; \
         split by the first, then split each output by the second"
    )]
    AmbiguousCombination,

    /// An index past the end of a collection was requested.
    #[error("index {index} is out of range for a collection of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// `|` was applied to two single intervals that neither touch nor overlap.
    #[error("cannot OR non-overlapping intervals [{a_start}, {a_stop}) and [{b_start}, {b_stop})")]
    DisjointIntervals {
        a_start: Timestamp,
        a_stop: Timestamp,
        b_start: Timestamp,
        b_stop: Timestamp,
    },

    /// Two intervals routed to the same destination overlap in time.
    #[error("intervals for destination {0} overlap in time")]
    OverlappingIntervals(i32),

    /// Two parallel vectors that must have matching lengths do not.
    #[error("length mismatch: expected {expected} entries, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Text could not be parsed as an ISO-8601 timestamp.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LogError>;
