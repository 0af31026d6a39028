//! Rate-limited access to the match data provider.

pub mod client;
pub mod limiter;
pub mod regions;

pub use client::{MatchListOptions, ProviderClient};
pub use limiter::{RateLimiterConfig, RateLimiterRegistry};
pub use regions::{Platform, Region};
