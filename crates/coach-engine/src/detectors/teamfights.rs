//! Teamfight clustering
//!
//! Groups champion kills by temporal adjacency: a kill joins the
//! current cluster when it lands within the gap of the cluster's last
//! kill. Clusters of three or more kills qualify as teamfights.

use crate::models::{EventType, Timeline, TimelineEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct TeamfightConfig {
    /// Maximum gap (ms) between consecutive kills of one fight.
    pub cluster_gap_ms: u64,
    /// Minimum kills for a cluster to qualify as a teamfight.
    pub min_kills: usize,
    /// Window (ms) around fight start to associate an elite monster.
    pub objective_window_ms: u64,
}

impl Default for TeamfightConfig {
    fn default() -> Self {
        Self {
            cluster_gap_ms: 15_000,
            min_kills: 3,
            objective_window_ms: 30_000,
        }
    }
}

/// One qualified kill cluster with the tracked participant's share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamfightEvent {
    /// Fight start, seconds from match start.
    pub timestamp: f64,
    /// Seconds from first to last kill of the cluster.
    pub duration: f64,
    /// Monster type of an elite kill near fight start, if any.
    pub objective: Option<String>,
    pub participated: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    /// Not derivable from timeline data; always zero today.
    pub damage_dealt: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TeamfightClusterer {
    config: TeamfightConfig,
}

impl TeamfightClusterer {
    pub fn new(config: TeamfightConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, timeline: &Timeline, participant_id: i32) -> Vec<TeamfightEvent> {
        let kills: Vec<&TimelineEvent> = timeline
            .frames()
            .iter()
            .flat_map(|f| f.events.iter())
            .filter(|e| e.event_type == EventType::ChampionKill)
            .collect();

        let monster_kills: Vec<&TimelineEvent> = timeline
            .frames()
            .iter()
            .flat_map(|f| f.events.iter())
            .filter(|e| e.event_type == EventType::EliteMonsterKill)
            .collect();

        let mut fights = Vec::new();
        let mut current: Vec<&TimelineEvent> = Vec::new();

        for kill in kills {
            let adjacent = current
                .last()
                .map(|last| kill.timestamp.saturating_sub(last.timestamp) < self.config.cluster_gap_ms)
                .unwrap_or(true);
            if adjacent {
                current.push(kill);
            } else {
                if current.len() >= self.config.min_kills {
                    fights.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                current.push(kill);
            }
        }
        if current.len() >= self.config.min_kills {
            fights.push(current);
        }

        fights
            .into_iter()
            .map(|fight| self.summarize(&fight, &monster_kills, participant_id))
            .collect()
    }

    fn summarize(
        &self,
        fight: &[&TimelineEvent],
        monster_kills: &[&TimelineEvent],
        participant_id: i32,
    ) -> TeamfightEvent {
        let start = fight.first().map(|e| e.timestamp).unwrap_or(0);
        let end = fight.last().map(|e| e.timestamp).unwrap_or(start);

        let objective = monster_kills
            .iter()
            .find(|e| e.timestamp.abs_diff(start) < self.config.objective_window_ms)
            .and_then(|e| e.monster_type.clone());

        TeamfightEvent {
            timestamp: start as f64 / 1_000.0,
            duration: (end - start) as f64 / 1_000.0,
            objective,
            participated: fight.iter().any(|e| e.involves(participant_id)),
            kills: fight
                .iter()
                .filter(|e| e.killer_id == Some(participant_id))
                .count() as u32,
            deaths: fight
                .iter()
                .filter(|e| e.victim_id == Some(participant_id))
                .count() as u32,
            assists: fight
                .iter()
                .filter(|e| e.assisted_by(participant_id))
                .count() as u32,
            damage_dealt: 0,
        }
    }
}
