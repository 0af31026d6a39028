//! Timeline-derived metrics, composed from the positional detectors.

use crate::detectors::{
    BadRecall, DangerZoneEntry, DeathAnalyzer, PunishableDeath, RecallAnalyzer,
    TeamfightClusterer, TeamfightEvent,
};
use crate::models::{EventType, MatchSummary, Participant, Timeline};
use serde::{Deserialize, Serialize};

/// One sample of a diff series. Timestamp is minutes from match start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub timestamp: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMetrics {
    pub wards_per_min: f64,
    /// Control wards placed per minute.
    pub control_ward_coverage: f64,
    pub danger_zone_entries: Vec<DangerZoneEntry>,
    pub punishable_deaths: Vec<PunishableDeath>,
    pub bad_recalls: Vec<BadRecall>,
    /// Gold lead over the mirrored lane opponent, per frame. Empty when
    /// no opponent holds the mirrored role.
    pub gold_diff_timeline: Vec<TimePoint>,
    pub xp_diff_timeline: Vec<TimePoint>,
    pub teamfights: Vec<TeamfightEvent>,
}

/// Runs every timeline detector for one participant and bundles the
/// results.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineAggregator {
    deaths: DeathAnalyzer,
    recalls: RecallAnalyzer,
    teamfights: TeamfightClusterer,
}

impl TimelineAggregator {
    pub fn compute(
        &self,
        timeline: &Timeline,
        summary: &MatchSummary,
        participant: &Participant,
    ) -> TimelineMetrics {
        let pid = participant.participant_id;
        let duration_min = summary.duration_min();

        let mut wards_placed = 0usize;
        let mut control_wards = 0usize;
        for event in timeline.frames().iter().flat_map(|f| f.events.iter()) {
            if event.event_type == EventType::WardPlaced && event.creator_id == Some(pid) {
                wards_placed += 1;
                if event.ward_type.as_deref() == Some("CONTROL_WARD") {
                    control_wards += 1;
                }
            }
        }
        let per_min = |count: usize| {
            if duration_min > 0.0 {
                count as f64 / duration_min
            } else {
                0.0
            }
        };

        let review = self.deaths.analyze(
            timeline,
            pid,
            participant.side(),
            &summary.ally_ids(participant),
        );

        let (gold_diff_timeline, xp_diff_timeline) = self.diff_series(timeline, summary, participant);

        TimelineMetrics {
            wards_per_min: per_min(wards_placed),
            control_ward_coverage: per_min(control_wards),
            danger_zone_entries: review.danger_zone_entries,
            punishable_deaths: review.punishable_deaths,
            bad_recalls: self.recalls.detect(timeline, pid, participant.team_id),
            gold_diff_timeline,
            xp_diff_timeline,
            teamfights: self.teamfights.detect(timeline, pid),
        }
    }

    /// Per-frame gold and xp leads over the mirrored lane opponent.
    fn diff_series(
        &self,
        timeline: &Timeline,
        summary: &MatchSummary,
        participant: &Participant,
    ) -> (Vec<TimePoint>, Vec<TimePoint>) {
        let Some(opponent) = summary.mirrored_opponent(participant) else {
            return (Vec::new(), Vec::new());
        };
        // Timeline participant ids are authoritative; fall back to the
        // match roster's id when the timeline omits its participant list.
        let opponent_pid = timeline
            .participant_id_for(&opponent.puuid)
            .unwrap_or(opponent.participant_id);

        let mut gold = Vec::new();
        let mut xp = Vec::new();
        for frame in timeline.frames() {
            let (Some(mine), Some(theirs)) = (
                frame.participant_frame(participant.participant_id),
                frame.participant_frame(opponent_pid),
            ) else {
                continue;
            };
            let minutes = frame.timestamp as f64 / 60_000.0;
            gold.push(TimePoint {
                timestamp: minutes,
                value: (mine.total_gold - theirs.total_gold) as f64,
            });
            xp.push(TimePoint {
                timestamp: minutes,
                value: (mine.xp - theirs.xp) as f64,
            });
        }
        (gold, xp)
    }
}
