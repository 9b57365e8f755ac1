pub(crate) mod splitting;
pub(crate) mod statistics;
pub(crate) mod trimming;
pub(crate) mod value_filter;

// Only re-export files with top-level types
pub use statistics::{StatisticType, Statistics};
pub use value_filter::ValueFilter;
