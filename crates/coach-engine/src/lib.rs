//! Coaching engine for post-game match analysis
//!
//! This crate provides the core functionality for:
//! - Rate-limited access to the match data provider
//! - Zone classification and positional detectors
//! - Per-participant metrics and coaching tag generation
//! - Feature pack assembly for downstream model consumption
//! - Health checks and observability

pub mod analyzer;
pub mod coaching;
pub mod detectors;
pub mod error;
pub mod feature_pack;
pub mod gateway;
pub mod health;
pub mod metrics;
pub mod models;
pub mod observability;
pub mod report;
pub mod zones;

pub use analyzer::{MatchAnalyzer, RankContext};
pub use error::{AnalysisError, ProviderError};
pub use feature_pack::FeaturePack;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{EngineMetrics, EventLogger};
pub use report::{parse_coaching_report, CoachingReport};
