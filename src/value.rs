//! The closed set of value types a series can hold.
//!
//! [`LogValue`] plays the role of a bound alias: every series operation is
//! generic over it, and the numeric-only operations (derivative, statistics,
//! value filters, histograms) ask [`LogValue::to_f64`] for a number and fail
//! with [`LogError::UnsupportedType`](crate::LogError::UnsupportedType) when
//! there is none.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Display};

/// A value type that can be logged in a [`TimeSeries`](crate::TimeSeries).
///
/// Implemented for signed and unsigned integers, floating point, `bool` and
/// `String`. Booleans count as numeric (`false = 0`, `true = 1`); text does not.
pub trait LogValue:
    'static + Clone + Debug + Display + PartialEq + PartialOrd + Serialize + DeserializeOwned
{
    /// Short type name used in error messages.
    const TYPE_NAME: &'static str;

    /// The value as `f64`, or `None` for non-numeric types.
    fn to_f64(&self) -> Option<f64>;

    /// Convenience for `to_f64().is_some()` on the type rather than a value.
    fn is_numeric() -> bool;
}

macro_rules! numeric_log_value {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl LogValue for $t {
                const TYPE_NAME: &'static str = $name;

                #[inline]
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless, clippy::unnecessary_cast)]
                fn to_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }

                #[inline]
                fn is_numeric() -> bool {
                    true
                }
            }
        )*
    };
}

numeric_log_value!(
    i32 => "i32",
    i64 => "i64",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
);

impl LogValue for bool {
    const TYPE_NAME: &'static str = "bool";

    #[inline]
    fn to_f64(&self) -> Option<f64> {
        Some(if *self { 1.0 } else { 0.0 })
    }

    #[inline]
    fn is_numeric() -> bool {
        true
    }
}

impl LogValue for String {
    const TYPE_NAME: &'static str = "string";

    #[inline]
    fn to_f64(&self) -> Option<f64> {
        None
    }

    #[inline]
    fn is_numeric() -> bool {
        false
    }
}
