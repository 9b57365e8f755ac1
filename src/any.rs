//! A series of any supported value type behind one type.
//!
//! [`AnyTimeSeries`] is the closed sum over every [`LogValue`](crate::LogValue)
//! instantiation. It lets callers keep logs of mixed types in one collection
//! and still ask numeric questions; text logs answer those with
//! [`LogError::UnsupportedType`](crate::LogError::UnsupportedType).

use crate::error::Result;
use crate::helpers::Statistics;
use crate::roi::TimeROI;
use crate::series::TimeSeries;
use crate::time::Timestamp;
use crate::value::LogValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AnyTimeSeries {
    I32(TimeSeries<i32>),
    I64(TimeSeries<i64>),
    U32(TimeSeries<u32>),
    U64(TimeSeries<u64>),
    F32(TimeSeries<f32>),
    F64(TimeSeries<f64>),
    Bool(TimeSeries<bool>),
    Text(TimeSeries<String>),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            AnyTimeSeries::I32($s) => $body,
            AnyTimeSeries::I64($s) => $body,
            AnyTimeSeries::U32($s) => $body,
            AnyTimeSeries::U64($s) => $body,
            AnyTimeSeries::F32($s) => $body,
            AnyTimeSeries::F64($s) => $body,
            AnyTimeSeries::Bool($s) => $body,
            AnyTimeSeries::Text($s) => $body,
        }
    };
}

macro_rules! impl_from_series {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<TimeSeries<$t>> for AnyTimeSeries {
                fn from(series: TimeSeries<$t>) -> Self {
                    Self::$variant(series)
                }
            }
        )*
    };
}

fn type_name_of<T: LogValue>(_: &TimeSeries<T>) -> &'static str {
    T::TYPE_NAME
}

impl_from_series!(
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Text,
);

impl AnyTimeSeries {
    #[must_use]
    pub fn name(&self) -> &str {
        dispatch!(self, s => s.name())
    }

    #[must_use]
    pub fn size(&self) -> usize {
        dispatch!(self, s => s.size())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        dispatch!(self, s => s.is_empty())
    }

    /// The value type's short name (`"f64"`, `"string"`, ...).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        dispatch!(self, s => type_name_of(s))
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    #[must_use]
    pub fn times_as_vector(&self) -> Vec<Timestamp> {
        dispatch!(self, s => s.times_as_vector())
    }

    /// Every value rendered with `Display`, in time order.
    #[must_use]
    pub fn values_as_strings(&self) -> Vec<String> {
        dispatch!(self, s => s.values_as_vector().iter().map(ToString::to_string).collect())
    }

    /// # Errors
    /// [`crate::LogError::EmptySeries`].
    pub fn first_time(&self) -> Result<Timestamp> {
        dispatch!(self, s => s.first_time())
    }

    /// # Errors
    /// [`crate::LogError::EmptySeries`].
    pub fn last_time(&self) -> Result<Timestamp> {
        dispatch!(self, s => s.last_time())
    }

    /// See [`TimeSeries::time_average_value`].
    ///
    /// # Errors
    /// [`crate::LogError::UnsupportedType`] for text.
    pub fn time_average_value(&self, roi: Option<&TimeROI>) -> Result<f64> {
        dispatch!(self, s => s.time_average_value(roi))
    }

    /// See [`TimeSeries::statistics`].
    ///
    /// # Errors
    /// [`crate::LogError::UnsupportedType`] for text.
    pub fn statistics(&self, roi: Option<&TimeROI>) -> Result<Statistics> {
        dispatch!(self, s => s.statistics(roi))
    }

    /// See [`TimeSeries::duration_in_seconds`].
    ///
    /// # Errors
    /// [`crate::LogError::EmptySeries`].
    pub fn duration_in_seconds(&self, roi: Option<&TimeROI>) -> Result<f64> {
        dispatch!(self, s => s.duration_in_seconds(roi))
    }

    pub fn remove_data_outside_roi(&mut self, roi: &TimeROI) {
        dispatch!(self, s => s.remove_data_outside_roi(roi));
    }

    pub fn filter_by_time(&mut self, start: Timestamp, stop: Timestamp) {
        dispatch!(self, s => s.filter_by_time(start, stop));
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<&TimeSeries<f64>> {
        match self {
            Self::F64(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&TimeSeries<String>> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}
