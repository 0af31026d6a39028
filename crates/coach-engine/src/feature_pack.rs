//! Feature pack assembly.
//!
//! Condenses one participant's match into a compact, model-friendly
//! bundle: metadata, fixed 2-minute windows, a capped list of key
//! events, aggregate metrics, roams and coaching tags.

use crate::coaching::CoachingTag;
use crate::detectors::{RoamEvent, RoamQuality};
use crate::metrics::{BaseMetrics, TimelineMetrics};
use crate::models::{queue_type, MatchSummary, Participant};
use serde::{Deserialize, Serialize};

const WINDOW_SIZE_SECS: u64 = 120;
const MAX_KEY_EVENTS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackMetadata {
    pub match_id: String,
    /// Seconds.
    pub game_duration: u64,
    pub game_version: String,
    pub role: String,
    pub champion: String,
    pub team_id: u16,
    pub win: bool,
    pub queue_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
}

/// One fixed-size slice of the match, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_min: f64,
    pub end_min: f64,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub wards_placed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_diff: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_diff: Option<f64>,
    pub objective_events: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    Vision,
    Death,
    Objective,
    Kill,
    Teamfight,
    Roam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

/// One notable moment, timestamped in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub timestamp: f64,
    #[serde(rename = "type")]
    pub kind: KeyEventKind,
    pub description: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub base: BaseMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineMetrics>,
}

/// The full analysis output for one participant in one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePack {
    pub metadata: PackMetadata,
    pub windows: Vec<TimeWindow>,
    pub key_events: Vec<KeyEvent>,
    pub aggregates: AggregateMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roam_events: Option<Vec<RoamEvent>>,
    pub coaching_tags: Vec<CoachingTag>,
}

impl FeaturePack {
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        summary: &MatchSummary,
        participant: &Participant,
        base: BaseMetrics,
        timeline: Option<TimelineMetrics>,
        coaching_tags: Vec<CoachingTag>,
        roam_events: Vec<RoamEvent>,
        tier: Option<String>,
        rank: Option<String>,
    ) -> Self {
        let metadata = PackMetadata {
            match_id: summary.match_id().to_string(),
            game_duration: summary.info.game_duration,
            game_version: summary.info.game_version.clone(),
            role: participant.role().label().to_string(),
            champion: participant.champion_name.clone(),
            team_id: participant.team_id,
            win: participant.win,
            queue_type: queue_type(summary.info.queue_id),
            tier,
            rank,
        };

        let windows = build_windows(summary.info.game_duration, timeline.as_ref());
        let key_events = build_key_events(&coaching_tags, &roam_events, timeline.as_ref());

        Self {
            metadata,
            windows,
            key_events,
            aggregates: AggregateMetrics {
                base,
                timeline,
            },
            roam_events: if roam_events.is_empty() {
                None
            } else {
                Some(roam_events)
            },
            coaching_tags,
        }
    }
}

fn build_windows(duration_s: u64, timeline: Option<&TimelineMetrics>) -> Vec<TimeWindow> {
    let mut windows = Vec::new();
    let mut start = 0u64;
    while start < duration_s {
        let start_min = start as f64 / 60.0;
        let end_min = (start + WINDOW_SIZE_SECS).min(duration_s) as f64 / 60.0;

        let sample = |points: &[crate::metrics::TimePoint]| {
            points
                .iter()
                .find(|t| t.timestamp >= start_min && t.timestamp < end_min)
                .map(|t| t.value)
        };

        windows.push(TimeWindow {
            start_min,
            end_min,
            kills: 0,
            deaths: 0,
            assists: 0,
            wards_placed: 0,
            gold_diff: timeline.and_then(|tm| sample(&tm.gold_diff_timeline)),
            xp_diff: timeline.and_then(|tm| sample(&tm.xp_diff_timeline)),
            objective_events: Vec::new(),
        });
        start += WINDOW_SIZE_SECS;
    }
    windows
}

fn build_key_events(
    coaching_tags: &[CoachingTag],
    roam_events: &[RoamEvent],
    timeline: Option<&TimelineMetrics>,
) -> Vec<KeyEvent> {
    let mut events = Vec::new();

    for tag in coaching_tags {
        for evidence in &tag.evidence {
            let Some(timestamp) = evidence.timestamp else {
                continue;
            };
            let kind = match tag.category.as_str() {
                "vision" => KeyEventKind::Vision,
                "positioning" => KeyEventKind::Death,
                "objectives" => KeyEventKind::Objective,
                "combat" => KeyEventKind::Kill,
                _ => KeyEventKind::Teamfight,
            };
            let impact = match tag.severity {
                crate::coaching::Severity::Strength => Impact::Positive,
                crate::coaching::Severity::Critical => Impact::Negative,
                _ => Impact::Neutral,
            };
            events.push(KeyEvent {
                timestamp,
                kind,
                description: format!(
                    "[{}] {}: {}",
                    tag.severity.upper_label(),
                    tag.label,
                    evidence.context.as_deref().unwrap_or(&tag.description)
                ),
                impact,
            });
        }
    }

    for roam in roam_events {
        events.push(KeyEvent {
            timestamp: roam.timestamp,
            kind: KeyEventKind::Roam,
            description: roam.evidence.clone(),
            impact: match roam.quality {
                RoamQuality::Good => Impact::Positive,
                RoamQuality::Bad => Impact::Negative,
                RoamQuality::Neutral => Impact::Neutral,
            },
        });
    }

    if let Some(tm) = timeline {
        for tf in &tm.teamfights {
            let at_objective = tf
                .objective
                .as_deref()
                .map(|o| format!(" at {o}"))
                .unwrap_or_default();
            let impact = if tf.participated && tf.deaths == 0 {
                Impact::Positive
            } else {
                Impact::Negative
            };
            events.push(KeyEvent {
                timestamp: tf.timestamp,
                kind: KeyEventKind::Teamfight,
                description: format!(
                    "Teamfight{}: {} ({}K/{}D/{}A)",
                    at_objective,
                    if tf.participated { "Present" } else { "ABSENT" },
                    tf.kills,
                    tf.deaths,
                    tf.assists
                ),
                impact,
            });
        }
    }

    events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    events.truncate(MAX_KEY_EVENTS);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coaching::{Severity, TagEvidence};
    use crate::detectors::{RoamCost, RoamOutcome};
    use crate::models::MatchInfo;

    fn summary(duration_s: u64) -> MatchSummary {
        MatchSummary {
            info: MatchInfo {
                game_duration: duration_s,
                game_version: "14.1.1".to_string(),
                queue_id: 420,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn base_metrics() -> BaseMetrics {
        let p = Participant::default();
        let s = summary(1_800);
        BaseMetrics::compute(&p, &s)
    }

    fn tag_with_evidence(timestamp: Option<f64>) -> CoachingTag {
        CoachingTag {
            id: "punishable-deaths".to_string(),
            category: "positioning".to_string(),
            label: "1 punishable death(s)".to_string(),
            severity: Severity::Critical,
            role: "MIDDLE".to_string(),
            description: "Died once in a dangerous zone.".to_string(),
            evidence: vec![TagEvidence {
                match_id: "NA1_1".to_string(),
                timestamp,
                event: None,
                context: Some("Died in river".to_string()),
            }],
        }
    }

    #[test]
    fn windows_cover_the_full_duration() {
        let pack = FeaturePack::assemble(
            &summary(1_560),
            &Participant::default(),
            base_metrics(),
            None,
            Vec::new(),
            Vec::new(),
            None,
            None,
        );
        // 26 minutes at 2-minute granularity, last window clipped.
        assert_eq!(pack.windows.len(), 13);
        assert!((pack.windows[12].start_min - 24.0).abs() < 1e-9);
        assert!((pack.windows[12].end_min - 26.0).abs() < 1e-9);
        assert_eq!(pack.metadata.queue_type, "Ranked Solo/Duo");
    }

    #[test]
    fn tag_evidence_becomes_a_negative_death_event() {
        let pack = FeaturePack::assemble(
            &summary(1_800),
            &Participant::default(),
            base_metrics(),
            None,
            vec![tag_with_evidence(Some(65.0))],
            Vec::new(),
            None,
            None,
        );
        assert_eq!(pack.key_events.len(), 1);
        let event = &pack.key_events[0];
        assert_eq!(event.kind, KeyEventKind::Death);
        assert_eq!(event.impact, Impact::Negative);
        assert!(event.description.starts_with("[CRITICAL]"));
        assert!(event.description.ends_with("Died in river"));
    }

    #[test]
    fn untimed_evidence_is_not_an_event() {
        let pack = FeaturePack::assemble(
            &summary(1_800),
            &Participant::default(),
            base_metrics(),
            None,
            vec![tag_with_evidence(None)],
            Vec::new(),
            None,
            None,
        );
        assert!(pack.key_events.is_empty());
    }

    #[test]
    fn key_events_are_sorted_and_capped() {
        let mut tags = Vec::new();
        for i in (0..60).rev() {
            tags.push(tag_with_evidence(Some(i as f64 * 10.0)));
        }
        let pack = FeaturePack::assemble(
            &summary(1_800),
            &Participant::default(),
            base_metrics(),
            None,
            tags,
            Vec::new(),
            None,
            None,
        );
        assert_eq!(pack.key_events.len(), 50);
        let timestamps: Vec<f64> = pack.key_events.iter().map(|e| e.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(timestamps, sorted);
        assert!((pack.key_events[0].timestamp - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_roam_list_serializes_as_absent() {
        let pack = FeaturePack::assemble(
            &summary(1_800),
            &Participant::default(),
            base_metrics(),
            None,
            Vec::new(),
            Vec::new(),
            None,
            None,
        );
        assert!(pack.roam_events.is_none());
        let json = serde_json::to_value(&pack).unwrap();
        assert!(json.get("roamEvents").is_none());
    }

    #[test]
    fn roams_become_roam_events() {
        let roam = RoamEvent {
            timestamp: 300.0,
            quality: RoamQuality::Good,
            departure_time: 300.0,
            return_time: 345.0,
            outcome: RoamOutcome {
                kills: 1,
                assists: 0,
                objectives_taken: 0,
            },
            cost: RoamCost {
                cs_lost: 3,
                plates_lost: 0,
                xp_lost: 0,
                tower_damage_taken: 0,
            },
            evidence: "GOOD_ROAM: 1K/0A, 0 obj | Cost: 3CS, 0 plates".to_string(),
        };
        let pack = FeaturePack::assemble(
            &summary(1_800),
            &Participant::default(),
            base_metrics(),
            None,
            Vec::new(),
            vec![roam],
            Some("GOLD".to_string()),
            Some("II".to_string()),
        );
        assert_eq!(pack.key_events.len(), 1);
        assert_eq!(pack.key_events[0].kind, KeyEventKind::Roam);
        assert_eq!(pack.key_events[0].impact, Impact::Positive);
        assert_eq!(pack.roam_events.as_ref().unwrap().len(), 1);
        assert_eq!(pack.metadata.tier.as_deref(), Some("GOLD"));
    }
}
