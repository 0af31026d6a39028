//! Temporal event detection over timeline frames
//!
//! Four independent analyzers, each consuming frames/events plus the
//! zone classifier and producing discrete, evidenced records:
//! - punishable deaths and danger-zone exposure
//! - badly timed recalls
//! - teamfight clusters
//! - qualified roams (mid/support only)

mod deaths;
mod recalls;
mod roam;
mod teamfights;

pub use deaths::{DangerZoneEntry, DeathAnalyzer, DeathAnalyzerConfig, DeathReview, PunishableDeath};
pub use recalls::{BadRecall, RecallAnalyzer, RecallAnalyzerConfig};
pub use roam::{RoamConfig, RoamCost, RoamDetector, RoamEvent, RoamOutcome, RoamQuality};
pub use teamfights::{TeamfightClusterer, TeamfightConfig, TeamfightEvent};
