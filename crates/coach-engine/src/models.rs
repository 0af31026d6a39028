//! Provider data model for match and timeline payloads
//!
//! Wire shapes follow the telemetry provider's JSON (camelCase keys,
//! missing fields tolerated via defaults). These types are inputs only;
//! derived analytics types live next to the code that produces them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Side of the map a team spawns on. Blue spawns bottom-left,
/// red spawns top-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Blue,
    Red,
}

impl TeamSide {
    /// Map the provider's numeric team id (100/200) to a side.
    pub fn from_team_id(team_id: u16) -> Self {
        if team_id == 100 {
            TeamSide::Blue
        } else {
            TeamSide::Red
        }
    }
}

/// Assigned position of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
    Unknown,
}

impl Role {
    pub fn from_label(label: &str) -> Self {
        match label {
            "TOP" => Role::Top,
            "JUNGLE" => Role::Jungle,
            "MIDDLE" => Role::Middle,
            "BOTTOM" => Role::Bottom,
            "UTILITY" => Role::Utility,
            _ => Role::Unknown,
        }
    }

    /// Lane roles are held to farming expectations; jungle and support
    /// are not.
    pub fn is_lane(&self) -> bool {
        matches!(self, Role::Top | Role::Middle | Role::Bottom)
    }

    /// Roles that are expected to leave their lane to impact the map.
    pub fn can_roam(&self) -> bool {
        matches!(self, Role::Middle | Role::Utility)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Middle => "MIDDLE",
            Role::Bottom => "BOTTOM",
            Role::Utility => "UTILITY",
            Role::Unknown => "UNKNOWN",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Unknown
    }
}

/// 2D map position in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Per-participant cumulative stats for one match.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    pub puuid: String,
    pub participant_id: i32,
    pub team_id: u16,
    pub champion_name: String,
    pub individual_position: String,
    pub team_position: String,
    pub win: bool,

    // Combat
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub quadra_kills: u32,
    pub penta_kills: u32,
    pub first_blood_kill: bool,
    pub first_blood_assist: bool,

    // Damage
    pub total_damage_dealt_to_champions: u64,

    // Economy
    pub gold_earned: u64,
    pub gold_spent: u64,
    pub total_minions_killed: u32,
    pub neutral_minions_killed: u32,

    // Vision
    pub vision_score: u32,
    pub wards_placed: u32,
    pub wards_killed: u32,
    pub detector_wards_placed: u32,

    // Objectives
    pub turret_kills: u32,
    pub dragon_kills: u32,
    pub baron_kills: u32,
    pub objectives_stolen: u32,

    // Life timing (seconds)
    pub time_played: u32,
    pub total_time_spent_dead: u32,
    pub longest_time_spent_living: u32,
}

impl Participant {
    /// Assigned role, preferring the provider's individual position.
    pub fn role(&self) -> Role {
        let role = Role::from_label(&self.individual_position);
        if role == Role::Unknown {
            Role::from_label(&self.team_position)
        } else {
            role
        }
    }

    pub fn side(&self) -> TeamSide {
        TeamSide::from_team_id(self.team_id)
    }

    /// Total creep score including jungle camps.
    pub fn total_cs(&self) -> u32 {
        self.total_minions_killed + self.neutral_minions_killed
    }

    pub fn objective_kills(&self) -> u32 {
        self.turret_kills + self.dragon_kills + self.baron_kills
    }
}

/// first/kills pair for one team objective category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectiveCount {
    pub first: bool,
    pub kills: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamObjectives {
    pub baron: ObjectiveCount,
    pub dragon: ObjectiveCount,
    pub rift_herald: ObjectiveCount,
    pub tower: ObjectiveCount,
    pub inhibitor: ObjectiveCount,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Team {
    pub team_id: u16,
    pub win: bool,
    pub objectives: TeamObjectives,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchMetadata {
    pub match_id: String,
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchInfo {
    /// Match length in seconds.
    pub game_duration: u64,
    pub game_version: String,
    pub queue_id: u32,
    pub participants: Vec<Participant>,
    pub teams: Vec<Team>,
}

/// One match as reported by the provider: participants, cumulative
/// stats, team objectives, duration. Fetched once, owned by the caller
/// for the duration of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchSummary {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

impl MatchSummary {
    pub fn match_id(&self) -> &str {
        &self.metadata.match_id
    }

    pub fn duration_min(&self) -> f64 {
        self.info.game_duration as f64 / 60.0
    }

    pub fn participant_by_puuid(&self, puuid: &str) -> Option<&Participant> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }

    pub fn participant_by_id(&self, participant_id: i32) -> Option<&Participant> {
        self.info
            .participants
            .iter()
            .find(|p| p.participant_id == participant_id)
    }

    pub fn team(&self, team_id: u16) -> Option<&Team> {
        self.info.teams.iter().find(|t| t.team_id == team_id)
    }

    /// Members of the given team.
    pub fn teammates_of(&self, team_id: u16) -> impl Iterator<Item = &Participant> {
        self.info
            .participants
            .iter()
            .filter(move |p| p.team_id == team_id)
    }

    /// Participant ids of allies, excluding the participant itself.
    pub fn ally_ids(&self, participant: &Participant) -> Vec<i32> {
        self.info
            .participants
            .iter()
            .filter(|p| {
                p.team_id == participant.team_id
                    && p.participant_id != participant.participant_id
            })
            .map(|p| p.participant_id)
            .collect()
    }

    /// Opponent occupying the mirrored role on the other team.
    pub fn mirrored_opponent(&self, participant: &Participant) -> Option<&Participant> {
        let role = participant.role();
        if role == Role::Unknown {
            return None;
        }
        self.info.participants.iter().find(|p| {
            p.team_id != participant.team_id
                && (Role::from_label(&p.individual_position) == role
                    || Role::from_label(&p.team_position) == role)
        })
    }
}

/// Discrete timeline event categories the engine cares about.
/// Everything else collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ChampionKill,
    WardPlaced,
    WardKill,
    TurretPlateDestroyed,
    BuildingKill,
    EliteMonsterKill,
    #[serde(other)]
    Other,
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Other
    }
}

/// One discrete event within a timeline frame.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Milliseconds from match start.
    pub timestamp: u64,
    pub killer_id: Option<i32>,
    pub victim_id: Option<i32>,
    pub assisting_participant_ids: Vec<i32>,
    pub creator_id: Option<i32>,
    pub position: Option<Position>,
    pub ward_type: Option<String>,
    pub monster_type: Option<String>,
    pub building_type: Option<String>,
    pub team_id: Option<u16>,
}

impl TimelineEvent {
    pub fn assisted_by(&self, participant_id: i32) -> bool {
        self.assisting_participant_ids.contains(&participant_id)
    }

    /// Killer, victim, or assist involvement.
    pub fn involves(&self, participant_id: i32) -> bool {
        self.killer_id == Some(participant_id)
            || self.victim_id == Some(participant_id)
            || self.assisted_by(participant_id)
    }

    /// Kill or assist credit for the participant.
    pub fn credited_to(&self, participant_id: i32) -> bool {
        self.killer_id == Some(participant_id) || self.assisted_by(participant_id)
    }
}

/// Positional/economic snapshot of one participant at a frame boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantFrame {
    pub participant_id: i32,
    pub position: Option<Position>,
    pub total_gold: i64,
    pub current_gold: i64,
    pub xp: i64,
    pub level: u32,
    pub minions_killed: u32,
    pub jungle_minions_killed: u32,
}

/// One timestamped snapshot of all participants plus the events that
/// occurred since the previous frame.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineFrame {
    /// Milliseconds from match start. Strictly increasing across frames.
    pub timestamp: u64,
    pub participant_frames: HashMap<String, ParticipantFrame>,
    pub events: Vec<TimelineEvent>,
}

impl TimelineFrame {
    pub fn participant_frame(&self, participant_id: i32) -> Option<&ParticipantFrame> {
        self.participant_frames.get(&participant_id.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineParticipant {
    pub participant_id: i32,
    pub puuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineInfo {
    /// Nominal spacing between frames in milliseconds.
    pub frame_interval: u64,
    pub frames: Vec<TimelineFrame>,
    pub participants: Vec<TimelineParticipant>,
}

/// Time-ordered positional/event telemetry for one match.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeline {
    pub metadata: MatchMetadata,
    pub info: TimelineInfo,
}

impl Timeline {
    pub fn frames(&self) -> &[TimelineFrame] {
        &self.info.frames
    }

    /// Frame interval with a sane fallback when the provider omits it.
    pub fn frame_interval(&self) -> u64 {
        if self.info.frame_interval == 0 {
            60_000
        } else {
            self.info.frame_interval
        }
    }

    pub fn participant_id_for(&self, puuid: &str) -> Option<i32> {
        self.info
            .participants
            .iter()
            .find(|p| p.puuid == puuid)
            .map(|p| p.participant_id)
    }
}

/// Human-readable queue label for known queue ids.
pub fn queue_type(queue_id: u32) -> String {
    match queue_id {
        420 => "Ranked Solo/Duo".to_string(),
        440 => "Ranked Flex".to_string(),
        400 => "Normal Draft".to_string(),
        430 => "Normal Blind".to_string(),
        450 => "ARAM".to_string(),
        700 => "Clash".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_prefers_individual_position() {
        let p = Participant {
            individual_position: "MIDDLE".to_string(),
            team_position: "TOP".to_string(),
            ..Default::default()
        };
        assert_eq!(p.role(), Role::Middle);
    }

    #[test]
    fn role_parsing_falls_back_to_team_position() {
        let p = Participant {
            individual_position: "Invalid".to_string(),
            team_position: "UTILITY".to_string(),
            ..Default::default()
        };
        assert_eq!(p.role(), Role::Utility);
    }

    #[test]
    fn unknown_event_types_deserialize_as_other() {
        let json = r#"{"type":"SKILL_LEVEL_UP","timestamp":1000}"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Other);
        assert_eq!(event.timestamp, 1000);
    }

    #[test]
    fn mirrored_opponent_matched_by_role() {
        let mut summary = MatchSummary::default();
        summary.info.participants = vec![
            Participant {
                participant_id: 1,
                team_id: 100,
                individual_position: "MIDDLE".to_string(),
                ..Default::default()
            },
            Participant {
                participant_id: 6,
                team_id: 200,
                individual_position: "MIDDLE".to_string(),
                ..Default::default()
            },
        ];
        let me = summary.participant_by_id(1).unwrap();
        let opp = summary.mirrored_opponent(me).unwrap();
        assert_eq!(opp.participant_id, 6);
    }

    #[test]
    fn mirrored_opponent_absent_is_none() {
        let mut summary = MatchSummary::default();
        summary.info.participants = vec![Participant {
            participant_id: 1,
            team_id: 100,
            individual_position: "MIDDLE".to_string(),
            ..Default::default()
        }];
        let me = summary.participant_by_id(1).unwrap();
        assert!(summary.mirrored_opponent(me).is_none());
    }

    #[test]
    fn frame_interval_fallback() {
        let timeline = Timeline::default();
        assert_eq!(timeline.frame_interval(), 60_000);
    }
}
