//! Metrics computable from cumulative participant stats alone.

use crate::models::{MatchSummary, Participant};
use serde::{Deserialize, Serialize};

/// Rate and share metrics for one participant. All per-minute values
/// use the full match duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMetrics {
    /// (kills + assists) / deaths. Infinity encodes a deathless game
    /// with takedowns; zero a deathless game without.
    pub kda: f64,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub cs_per_min: f64,
    pub gold_per_min: f64,
    pub damage_per_min: f64,
    /// Share of the team's champion damage dealt by this participant.
    pub damage_share: f64,
    /// Share of the team's kills this participant took part in.
    pub kill_participation: f64,
    pub vision_score: u32,
    pub wards_placed: u32,
    pub wards_killed: u32,
    pub control_wards_placed: u32,
    /// Gold spent over gold earned; low values mean gold sat unspent.
    pub gold_efficiency: f64,
    /// Average life length over the longest life. Values near 1 mean
    /// deaths were evenly spread; low values mean clustered deaths.
    pub death_timing_score: f64,
    /// Share of the team's turret/dragon/baron kills credited here.
    pub objective_participation: f64,
}

impl BaseMetrics {
    pub fn compute(participant: &Participant, summary: &MatchSummary) -> Self {
        let duration_min = summary.duration_min();

        let mut team_kills = 0u32;
        let mut team_damage = 0u64;
        let mut team_objective_kills = 0u32;
        for teammate in summary.teammates_of(participant.team_id) {
            team_kills += teammate.kills;
            team_damage += teammate.total_damage_dealt_to_champions;
            team_objective_kills += teammate.objective_kills();
        }

        let takedowns = participant.kills + participant.assists;
        let kda = if participant.deaths == 0 {
            if takedowns > 0 {
                f64::INFINITY
            } else {
                0.0
            }
        } else {
            f64::from(takedowns) / f64::from(participant.deaths)
        };

        let kill_participation = if team_kills > 0 {
            f64::from(takedowns) / f64::from(team_kills)
        } else {
            0.0
        };
        let damage_share = if team_damage > 0 {
            participant.total_damage_dealt_to_champions as f64 / team_damage as f64
        } else {
            0.0
        };
        let gold_efficiency = if participant.gold_earned > 0 {
            participant.gold_spent as f64 / participant.gold_earned as f64
        } else {
            0.0
        };

        let time_alive =
            f64::from(participant.time_played.saturating_sub(participant.total_time_spent_dead));
        let avg_time_alive = if participant.deaths > 0 {
            time_alive / f64::from(participant.deaths + 1)
        } else {
            time_alive
        };
        let death_timing_score = if participant.longest_time_spent_living > 0 {
            avg_time_alive / f64::from(participant.longest_time_spent_living)
        } else {
            1.0
        };

        let objective_participation = if team_objective_kills > 0 {
            f64::from(participant.objective_kills()) / f64::from(team_objective_kills)
        } else {
            0.0
        };

        let per_min = |value: f64| if duration_min > 0.0 { value / duration_min } else { 0.0 };

        Self {
            kda,
            kills: participant.kills,
            deaths: participant.deaths,
            assists: participant.assists,
            cs_per_min: per_min(f64::from(participant.total_cs())),
            gold_per_min: per_min(participant.gold_earned as f64),
            damage_per_min: per_min(participant.total_damage_dealt_to_champions as f64),
            damage_share,
            kill_participation,
            vision_score: participant.vision_score,
            wards_placed: participant.wards_placed,
            wards_killed: participant.wards_killed,
            control_wards_placed: participant.detector_wards_placed,
            gold_efficiency,
            death_timing_score,
            objective_participation,
        }
    }
}

/// Display form of a KDA ratio.
pub fn format_kda(kda: f64) -> String {
    if kda.is_infinite() {
        "Perfect".to_string()
    } else {
        format!("{kda:.2}")
    }
}
