//! Per-participant metrics derived from match and timeline data.

pub mod base;
pub mod timeline;

pub use base::{format_kda, BaseMetrics};
pub use timeline::{TimePoint, TimelineAggregator, TimelineMetrics};
