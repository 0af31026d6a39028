//! Roam detection for mid and support players.
//!
//! Tracks distance from the player's lane center across frames. A roam
//! starts when the player leaves the lane radius after the laning grace
//! period and ends on the first frame back in lane. Each bounded roam
//! is scored by weighing kills, assists and objectives against farm,
//! plates and towers given up while away.

use crate::models::{EventType, Participant, Position, Role, Timeline, TimelineEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct RoamConfig {
    /// Distance from lane center beyond which the player counts as away.
    pub departure_threshold: f64,
    /// Shortest absence (ms) that counts as a roam.
    pub min_duration_ms: u64,
    /// Longest absence (ms) still treated as a single roam.
    pub max_duration_ms: u64,
    /// No roams are scored before this point (ms); early movement is
    /// lane assignment noise.
    pub grace_ms: u64,
    /// Lane CS a laner is expected to collect per minute.
    pub expected_cs_per_min: f64,
}

impl Default for RoamConfig {
    fn default() -> Self {
        Self {
            departure_threshold: 3_500.0,
            min_duration_ms: 15_000,
            max_duration_ms: 120_000,
            grace_ms: 180_000,
            expected_cs_per_min: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoamQuality {
    #[serde(rename = "GOOD_ROAM")]
    Good,
    #[serde(rename = "NEUTRAL_ROAM")]
    Neutral,
    #[serde(rename = "BAD_ROAM")]
    Bad,
}

impl RoamQuality {
    pub fn label(&self) -> &'static str {
        match self {
            RoamQuality::Good => "GOOD_ROAM",
            RoamQuality::Neutral => "NEUTRAL_ROAM",
            RoamQuality::Bad => "BAD_ROAM",
        }
    }
}

/// What the roam produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamOutcome {
    pub kills: u32,
    pub assists: u32,
    pub objectives_taken: u32,
}

/// What the roam gave up back in lane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamCost {
    pub cs_lost: u32,
    pub plates_lost: u32,
    /// Not derivable from frame data today; always zero.
    pub xp_lost: u32,
    pub tower_damage_taken: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamEvent {
    /// Departure time, seconds from match start.
    pub timestamp: f64,
    pub quality: RoamQuality,
    pub departure_time: f64,
    pub return_time: f64,
    pub outcome: RoamOutcome,
    pub cost: RoamCost,
    pub evidence: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoamDetector {
    config: RoamConfig,
}

impl RoamDetector {
    pub fn new(config: RoamConfig) -> Self {
        Self { config }
    }

    /// Detect and score roams for one participant. Only mid and support
    /// players are expected to roam; everyone else gets an empty list.
    pub fn detect(&self, timeline: &Timeline, participant: &Participant) -> Vec<RoamEvent> {
        let role = participant.role();
        if !role.can_roam() {
            return Vec::new();
        }
        // Supports are anchored to the bottom lane.
        let lane_center = if role == Role::Middle {
            Position::new(7_500.0, 7_500.0)
        } else {
            Position::new(12_000.0, 3_000.0)
        };

        let frames = timeline.frames();
        let mut roams = Vec::new();

        let mut roam_start: Option<u64> = None;
        let mut roam_start_cs = 0u32;
        let mut was_in_lane = true;

        for frame in frames {
            let Some(pframe) = frame.participant_frame(participant.participant_id) else {
                continue;
            };
            let Some(position) = pframe.position else {
                continue;
            };

            let in_lane = position.distance(lane_center) < self.config.departure_threshold;

            if was_in_lane && !in_lane && frame.timestamp > self.config.grace_ms {
                roam_start = Some(frame.timestamp);
                roam_start_cs = pframe.minions_killed;
            }

            if !was_in_lane && in_lane {
                if let Some(start) = roam_start.take() {
                    let duration = frame.timestamp - start;
                    if (self.config.min_duration_ms..=self.config.max_duration_ms)
                        .contains(&duration)
                    {
                        let window: Vec<&TimelineEvent> = frames
                            .iter()
                            .flat_map(|f| f.events.iter())
                            .filter(|e| e.timestamp >= start && e.timestamp <= frame.timestamp)
                            .collect();
                        roams.push(self.score(
                            participant,
                            &window,
                            start,
                            frame.timestamp,
                            pframe.minions_killed.saturating_sub(roam_start_cs),
                        ));
                    }
                }
            }

            was_in_lane = in_lane;
        }

        roams
    }

    fn score(
        &self,
        participant: &Participant,
        window: &[&TimelineEvent],
        start_ms: u64,
        end_ms: u64,
        cs_gained: u32,
    ) -> RoamEvent {
        let pid = participant.participant_id;

        let kills = window
            .iter()
            .filter(|e| e.event_type == EventType::ChampionKill && e.killer_id == Some(pid))
            .count() as u32;
        let assists = window
            .iter()
            .filter(|e| e.event_type == EventType::ChampionKill && e.assisted_by(pid))
            .count() as u32;
        let objectives = window
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    EventType::EliteMonsterKill | EventType::BuildingKill
                ) && e.credited_to(pid)
            })
            .count() as u32;

        let duration_min = (end_ms - start_ms) as f64 / 60_000.0;
        let cs_lost =
            (duration_min * self.config.expected_cs_per_min - cs_gained as f64).max(0.0);

        let plates_lost = window
            .iter()
            .filter(|e| {
                e.event_type == EventType::TurretPlateDestroyed
                    && e.team_id != Some(participant.team_id)
            })
            .count() as u32;
        let towers_lost = window
            .iter()
            .filter(|e| {
                e.event_type == EventType::BuildingKill
                    && e.team_id != Some(participant.team_id)
            })
            .count() as u32;

        let reward = f64::from(kills) * 3.0 + f64::from(assists) * 2.0 + f64::from(objectives) * 4.0;
        let cost = cs_lost * 0.3 + f64::from(plates_lost) * 2.0 + f64::from(towers_lost) * 3.0;

        let quality = if reward >= 3.0 && reward > cost {
            RoamQuality::Good
        } else if reward >= cost * 0.8 {
            RoamQuality::Neutral
        } else {
            RoamQuality::Bad
        };

        let cs_lost_rounded = cs_lost.round() as u32;
        RoamEvent {
            timestamp: start_ms as f64 / 1_000.0,
            quality,
            departure_time: start_ms as f64 / 1_000.0,
            return_time: end_ms as f64 / 1_000.0,
            outcome: RoamOutcome {
                kills,
                assists,
                objectives_taken: objectives,
            },
            cost: RoamCost {
                cs_lost: cs_lost_rounded,
                plates_lost,
                xp_lost: 0,
                tower_damage_taken: towers_lost,
            },
            evidence: format!(
                "{}: {}K/{}A, {} obj | Cost: {}CS, {} plates",
                quality.label(),
                kills,
                assists,
                objectives,
                cs_lost_rounded,
                plates_lost
            ),
        }
    }
}
