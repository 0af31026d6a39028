//! Punishable-death detection and danger-zone exposure tracking
//!
//! A death in a risky zone is "punishable" when the victim had neither
//! ward coverage nor backup. Every risky-zone death also counts toward
//! broader danger-zone exposure statistics, punishable or not.

use crate::models::{EventType, TeamSide, Timeline, TimelineEvent};
use crate::zones::{Zone, ZoneClassifier};
use serde::{Deserialize, Serialize};

/// Thresholds for vision/backup checks around a death.
#[derive(Debug, Clone, Copy)]
pub struct DeathAnalyzerConfig {
    /// Radius (map units) within which another participant counts as a
    /// nearby ally.
    pub ally_radius: f64,
    /// Radius (map units) within which a ward counts as covering the
    /// death position.
    pub ward_radius: f64,
    /// How far back (ms) a ward placement still counts as coverage.
    pub ward_lookback_ms: u64,
}

impl Default for DeathAnalyzerConfig {
    fn default() -> Self {
        Self {
            ally_radius: 2_500.0,
            ward_radius: 3_000.0,
            ward_lookback_ms: 90_000,
        }
    }
}

/// A death in a risky zone with no ward coverage and at most one ally
/// nearby.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishableDeath {
    /// Seconds from match start.
    pub timestamp: f64,
    pub zone: Zone,
    pub had_vision: bool,
    pub allies_nearby: usize,
    pub description: String,
}

/// Any death inside a risky zone, recorded for exposure statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerZoneEntry {
    /// Seconds from match start.
    pub timestamp: f64,
    pub zone: Zone,
    pub had_vision: bool,
    pub allies_nearby: usize,
    pub survived: bool,
}

/// Combined output of one death-analysis pass.
#[derive(Debug, Clone, Default)]
pub struct DeathReview {
    pub punishable_deaths: Vec<PunishableDeath>,
    pub danger_zone_entries: Vec<DangerZoneEntry>,
}

#[derive(Debug, Clone, Copy)]
pub struct DeathAnalyzer {
    config: DeathAnalyzerConfig,
    classifier: ZoneClassifier,
}

impl DeathAnalyzer {
    pub fn new(classifier: ZoneClassifier, config: DeathAnalyzerConfig) -> Self {
        Self { config, classifier }
    }

    /// Review all deaths of the tracked participant. Deaths without a
    /// recorded position are skipped; deaths on neutral ground produce
    /// nothing.
    pub fn analyze(
        &self,
        timeline: &Timeline,
        participant_id: i32,
        side: TeamSide,
        ally_ids: &[i32],
    ) -> DeathReview {
        let frames = timeline.frames();
        if frames.is_empty() {
            return DeathReview::default();
        }

        // Team ward placements, used for the coverage check.
        let team_wards: Vec<&TimelineEvent> = frames
            .iter()
            .flat_map(|f| f.events.iter())
            .filter(|e| {
                e.event_type == EventType::WardPlaced
                    && e.creator_id
                        .map(|c| c == participant_id || ally_ids.contains(&c))
                        .unwrap_or(false)
            })
            .collect();

        let mut review = DeathReview::default();
        let frame_interval = timeline.frame_interval();

        for death in frames.iter().flat_map(|f| f.events.iter()).filter(|e| {
            e.event_type == EventType::ChampionKill && e.victim_id == Some(participant_id)
        }) {
            let Some(position) = death.position else {
                continue;
            };
            let Some(zone) = self.classifier.classify(position, side) else {
                continue;
            };

            // Ally headcount at the frame enclosing the death.
            let frame_idx = ((death.timestamp / frame_interval) as usize).min(frames.len() - 1);
            let allies_nearby = ally_ids
                .iter()
                .filter_map(|id| frames[frame_idx].participant_frame(*id))
                .filter_map(|pf| pf.position)
                .filter(|p| p.distance(position) < self.config.ally_radius)
                .count();

            let had_vision = team_wards.iter().any(|w| {
                let Some(ward_pos) = w.position else {
                    return false;
                };
                if w.timestamp > death.timestamp {
                    return false;
                }
                death.timestamp - w.timestamp <= self.config.ward_lookback_ms
                    && ward_pos.distance(position) < self.config.ward_radius
            });

            let timestamp = death.timestamp as f64 / 1_000.0;

            if !had_vision && allies_nearby <= 1 {
                review.punishable_deaths.push(PunishableDeath {
                    timestamp,
                    zone,
                    had_vision,
                    allies_nearby,
                    description: format!(
                        "Died in {} without vision and only {} allies nearby",
                        zone.label(),
                        allies_nearby
                    ),
                });
            }

            review.danger_zone_entries.push(DangerZoneEntry {
                timestamp,
                zone,
                had_vision,
                allies_nearby,
                survived: false,
            });
        }

        review
    }
}

impl Default for DeathAnalyzer {
    fn default() -> Self {
        Self::new(ZoneClassifier::default(), DeathAnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, TimelineFrame, TimelineInfo};

    fn kill_event(timestamp: u64, victim: i32, position: Position) -> TimelineEvent {
        TimelineEvent {
            event_type: EventType::ChampionKill,
            timestamp,
            victim_id: Some(victim),
            position: Some(position),
            ..Default::default()
        }
    }

    fn timeline_with_frames(frames: Vec<TimelineFrame>) -> Timeline {
        Timeline {
            info: TimelineInfo {
                frame_interval: 60_000,
                frames,
                participants: Vec::new(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn lone_river_death_without_vision_is_punishable() {
        let river = Position::new(7_500.0, 7_500.0);
        let frames = vec![
            TimelineFrame {
                timestamp: 0,
                ..Default::default()
            },
            TimelineFrame {
                timestamp: 60_000,
                events: vec![kill_event(65_000, 1, river)],
                ..Default::default()
            },
        ];
        let timeline = timeline_with_frames(frames);

        let analyzer = DeathAnalyzer::default();
        let review = analyzer.analyze(&timeline, 1, TeamSide::Blue, &[2, 3, 4, 5]);

        assert_eq!(review.punishable_deaths.len(), 1);
        assert_eq!(review.danger_zone_entries.len(), 1);
        let death = &review.punishable_deaths[0];
        assert_eq!(death.zone, Zone::River);
        assert!(!death.had_vision);
        assert_eq!(death.allies_nearby, 0);
        assert!((death.timestamp - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recent_nearby_ward_suppresses_punishable() {
        let river = Position::new(7_500.0, 7_500.0);
        let ward = TimelineEvent {
            event_type: EventType::WardPlaced,
            timestamp: 30_000,
            creator_id: Some(2),
            position: Some(Position::new(7_700.0, 7_400.0)),
            ..Default::default()
        };
        let frames = vec![TimelineFrame {
            timestamp: 60_000,
            events: vec![ward, kill_event(65_000, 1, river)],
            ..Default::default()
        }];
        let timeline = timeline_with_frames(frames);

        let review = DeathAnalyzer::default().analyze(&timeline, 1, TeamSide::Blue, &[2]);

        assert!(review.punishable_deaths.is_empty());
        // Still counts as danger-zone exposure.
        assert_eq!(review.danger_zone_entries.len(), 1);
        assert!(review.danger_zone_entries[0].had_vision);
    }

    #[test]
    fn death_without_position_is_skipped() {
        let mut event = kill_event(65_000, 1, Position::default());
        event.position = None;
        let frames = vec![TimelineFrame {
            timestamp: 60_000,
            events: vec![event],
            ..Default::default()
        }];
        let timeline = timeline_with_frames(frames);

        let review = DeathAnalyzer::default().analyze(&timeline, 1, TeamSide::Blue, &[]);
        assert!(review.punishable_deaths.is_empty());
        assert!(review.danger_zone_entries.is_empty());
    }

    #[test]
    fn neutral_ground_death_is_ignored() {
        let own_lane = Position::new(2_000.0, 2_000.0);
        let frames = vec![TimelineFrame {
            timestamp: 60_000,
            events: vec![kill_event(65_000, 1, own_lane)],
            ..Default::default()
        }];
        let timeline = timeline_with_frames(frames);

        let review = DeathAnalyzer::default().analyze(&timeline, 1, TeamSide::Blue, &[]);
        assert!(review.danger_zone_entries.is_empty());
    }

    #[test]
    fn empty_timeline_short_circuits() {
        let review =
            DeathAnalyzer::default().analyze(&Timeline::default(), 1, TeamSide::Blue, &[]);
        assert!(review.punishable_deaths.is_empty());
    }
}
