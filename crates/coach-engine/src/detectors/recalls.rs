//! Bad-recall detection
//!
//! Flags frames where the participant stopped farming while the enemy
//! cashed in turret plates, i.e. a recall timed into lane pressure.
//! The CS-loss figure is a heuristic estimate against a fixed accrual
//! rate, kept as-is for behavioral compatibility.

use crate::models::{EventType, Timeline};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct RecallAnalyzerConfig {
    /// Early-game grace period (ms) before recalls are judged.
    pub grace_ms: u64,
    /// Minion-kill delta at or below this marks a non-farming frame.
    pub cs_delta_threshold: u32,
    /// Expected CS accrued per frame when farming normally.
    pub expected_cs_per_frame: f64,
}

impl Default for RecallAnalyzerConfig {
    fn default() -> Self {
        Self {
            grace_ms: 180_000,
            cs_delta_threshold: 1,
            expected_cs_per_frame: 6.0,
        }
    }
}

/// A recall window that cost CS and turret plates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadRecall {
    /// Seconds from match start.
    pub timestamp: f64,
    /// Estimated CS given up against the expected accrual rate.
    pub cs_lost: f64,
    pub plates_lost: u32,
    /// Not derivable from frame data; always zero today.
    pub xp_lost: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecallAnalyzer {
    config: RecallAnalyzerConfig,
}

impl RecallAnalyzer {
    pub fn new(config: RecallAnalyzerConfig) -> Self {
        Self { config }
    }

    /// Scan consecutive frame pairs for recall windows where the enemy
    /// took plates. The first few and last two frames are excluded to
    /// avoid spawn and game-end noise.
    pub fn detect(&self, timeline: &Timeline, participant_id: i32, team_id: u16) -> Vec<BadRecall> {
        let frames = timeline.frames();
        let mut recalls = Vec::new();

        for i in 1..frames.len() {
            let (Some(prev), Some(curr)) = (
                frames[i - 1].participant_frame(participant_id),
                frames[i].participant_frame(participant_id),
            ) else {
                continue;
            };

            let cs_delta = curr.minions_killed.saturating_sub(prev.minions_killed);

            if cs_delta > self.config.cs_delta_threshold
                || i <= 3
                || i >= frames.len() - 2
                || frames[i].timestamp <= self.config.grace_ms
            {
                continue;
            }

            let plates_lost = frames[i]
                .events
                .iter()
                .filter(|e| {
                    e.event_type == EventType::TurretPlateDestroyed
                        && e.team_id.map(|t| t != team_id).unwrap_or(false)
                })
                .count() as u32;

            if plates_lost > 0 {
                recalls.push(BadRecall {
                    timestamp: frames[i].timestamp as f64 / 1_000.0,
                    cs_lost: (self.config.expected_cs_per_frame - cs_delta as f64).max(0.0),
                    plates_lost,
                    xp_lost: 0.0,
                    description: format!("Lost {} plate(s) during back timing", plates_lost),
                });
            }
        }

        recalls
    }
}
