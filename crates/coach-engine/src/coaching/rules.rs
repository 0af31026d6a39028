//! The coaching rule table.
//!
//! Rules are plain functions over a shared context, registered in
//! fixed tables so the output order is stable: universal rules, then
//! the player's role table, then rules that need timeline metrics.

use super::{CoachingTag, Severity, TagEvidence};
use crate::metrics::{BaseMetrics, TimelineMetrics};
use crate::models::{MatchSummary, Participant, Role};
use crate::zones::Zone;

/// Everything a rule may inspect for one participant.
pub struct RuleContext<'a> {
    pub participant: &'a Participant,
    pub summary: &'a MatchSummary,
    pub base: &'a BaseMetrics,
    pub timeline: Option<&'a TimelineMetrics>,
    pub role: Role,
    pub match_id: &'a str,
    pub duration_min: f64,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        participant: &'a Participant,
        summary: &'a MatchSummary,
        base: &'a BaseMetrics,
        timeline: Option<&'a TimelineMetrics>,
    ) -> Self {
        Self {
            participant,
            summary,
            base,
            timeline,
            role: participant.role(),
            match_id: summary.match_id(),
            duration_min: summary.duration_min(),
        }
    }

    fn role_label(&self) -> &'static str {
        self.role.label()
    }

    fn match_evidence(&self) -> Vec<TagEvidence> {
        vec![TagEvidence::match_only(self.match_id)]
    }
}

struct Rule {
    #[allow(dead_code)]
    id: &'static str,
    eval: fn(&RuleContext) -> Option<CoachingTag>,
}

/// Run every applicable rule, in table order.
pub fn generate_tags(ctx: &RuleContext) -> Vec<CoachingTag> {
    let role_rules: &[Rule] = match ctx.role {
        Role::Top => TOP_RULES,
        Role::Jungle => JUNGLE_RULES,
        Role::Middle => MID_RULES,
        Role::Bottom => BOTTOM_RULES,
        Role::Utility => SUPPORT_RULES,
        Role::Unknown => &[],
    };

    UNIVERSAL_RULES
        .iter()
        .chain(role_rules)
        .chain(TIMELINE_RULES)
        .filter_map(|rule| (rule.eval)(ctx))
        .collect()
}

static UNIVERSAL_RULES: &[Rule] = &[
    Rule { id: "vision-low", eval: vision_low },
    Rule { id: "vision-high", eval: vision_high },
    Rule { id: "no-control-wards", eval: no_control_wards },
    Rule { id: "high-deaths", eval: high_deaths },
    Rule { id: "high-kda", eval: high_kda },
    Rule { id: "low-kp", eval: low_kill_participation },
    Rule { id: "low-cs", eval: low_cs },
    Rule { id: "high-cs", eval: high_cs },
];

static TOP_RULES: &[Rule] = &[
    Rule { id: "top-overextend", eval: top_overextend },
    Rule { id: "top-low-damage", eval: top_low_damage },
    Rule { id: "top-tower-pressure", eval: top_tower_pressure },
];

static JUNGLE_RULES: &[Rule] = &[
    Rule { id: "jg-no-dragons", eval: jungle_no_dragons },
    Rule { id: "jg-dragon-control", eval: jungle_dragon_control },
    Rule { id: "jg-baron-secured", eval: jungle_baron_secured },
    Rule { id: "jg-low-farm", eval: jungle_low_farm },
    Rule { id: "jg-low-impact", eval: jungle_low_impact },
    Rule { id: "jg-steals", eval: jungle_steals },
];

static MID_RULES: &[Rule] = &[
    Rule { id: "mid-behind-15", eval: mid_behind_at_15 },
    Rule { id: "mid-carry-damage", eval: mid_carry_damage },
    Rule { id: "mid-first-blood", eval: mid_first_blood },
];

static BOTTOM_RULES: &[Rule] = &[
    Rule { id: "adc-dies-before-obj", eval: adc_dies_before_objectives },
    Rule { id: "adc-low-dpm", eval: adc_low_dpm },
    Rule { id: "adc-high-dpm", eval: adc_high_dpm },
    Rule { id: "adc-penta", eval: adc_pentakill },
    Rule { id: "adc-quadra", eval: adc_quadrakill },
];

static SUPPORT_RULES: &[Rule] = &[
    Rule { id: "sup-low-wards", eval: support_low_wards },
    Rule { id: "sup-ward-clearing", eval: support_ward_clearing },
    Rule { id: "sup-high-kp", eval: support_high_kp },
    Rule { id: "sup-warding-deaths", eval: support_warding_deaths },
];

static TIMELINE_RULES: &[Rule] = &[
    Rule { id: "punishable-deaths", eval: punishable_deaths },
    Rule { id: "bad-recalls", eval: bad_recalls },
    Rule { id: "missed-objective-fights", eval: missed_objective_fights },
];

// ─── Universal ───

fn vision_per_min(ctx: &RuleContext) -> f64 {
    if ctx.duration_min > 0.0 {
        f64::from(ctx.participant.vision_score) / ctx.duration_min
    } else {
        0.0
    }
}

fn vision_low(ctx: &RuleContext) -> Option<CoachingTag> {
    let per_min = vision_per_min(ctx);
    (per_min < 0.5).then(|| {
        CoachingTag::new(
            "vision-low",
            "vision",
            "Very low vision score",
            Severity::Critical,
            ctx.role_label(),
            format!(
                "Vision score {} ({per_min:.1}/min) is well below average. Aim for at least 1.0/min.",
                ctx.participant.vision_score
            ),
            ctx.match_evidence(),
        )
    })
}

fn vision_high(ctx: &RuleContext) -> Option<CoachingTag> {
    let per_min = vision_per_min(ctx);
    (per_min >= 1.5).then(|| {
        CoachingTag::new(
            "vision-high",
            "vision",
            "Excellent vision control",
            Severity::Strength,
            ctx.role_label(),
            format!(
                "Vision score {} ({per_min:.1}/min) is excellent.",
                ctx.participant.vision_score
            ),
            ctx.match_evidence(),
        )
    })
}

fn no_control_wards(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.participant.detector_wards_placed == 0 && ctx.duration_min > 10.0).then(|| {
        CoachingTag::new(
            "no-control-wards",
            "vision",
            "No control wards placed",
            Severity::Critical,
            ctx.role_label(),
            "Zero control wards placed. Buy and place at least 1 control ward per 5 minutes.",
            ctx.match_evidence(),
        )
    })
}

fn high_deaths(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.participant.deaths > 7).then(|| {
        CoachingTag::new(
            "high-deaths",
            "positioning",
            "Too many deaths",
            Severity::Critical,
            ctx.role_label(),
            format!(
                "{} deaths is too many. Each death costs gold and map pressure.",
                ctx.participant.deaths
            ),
            ctx.match_evidence(),
        )
    })
}

fn high_kda(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.kda >= 5.0).then(|| {
        let shown = if ctx.base.kda.is_infinite() {
            "Perfect".to_string()
        } else {
            format!("{:.1}", ctx.base.kda)
        };
        CoachingTag::new(
            "high-kda",
            "combat",
            "Excellent KDA",
            Severity::Strength,
            ctx.role_label(),
            format!("KDA of {shown} shows strong combat performance."),
            ctx.match_evidence(),
        )
    })
}

fn low_kill_participation(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.kill_participation < 0.3 && ctx.role != Role::Top).then(|| {
        CoachingTag::new(
            "low-kp",
            "teamplay",
            "Low kill participation",
            Severity::Warning,
            ctx.role_label(),
            format!(
                "Kill participation of {:.0}% is low. Join more team fights or coordinate with your team.",
                ctx.base.kill_participation * 100.0
            ),
            ctx.match_evidence(),
        )
    })
}

fn low_cs(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.role.is_lane() && ctx.base.cs_per_min < 5.0).then(|| {
        CoachingTag::new(
            "low-cs",
            "farming",
            "Low CS/min",
            Severity::Warning,
            ctx.role_label(),
            format!(
                "{:.1} CS/min is below par. Practice last hitting, aiming for 7+ CS/min.",
                ctx.base.cs_per_min
            ),
            ctx.match_evidence(),
        )
    })
}

fn high_cs(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.role.is_lane() && ctx.base.cs_per_min >= 8.0).then(|| {
        CoachingTag::new(
            "high-cs",
            "farming",
            "Strong CS/min",
            Severity::Strength,
            ctx.role_label(),
            format!("{:.1} CS/min shows solid farming.", ctx.base.cs_per_min),
            ctx.match_evidence(),
        )
    })
}

// ─── Top ───

fn top_overextend(ctx: &RuleContext) -> Option<CoachingTag> {
    let timeline = ctx.timeline?;
    if timeline.danger_zone_entries.len() <= 3 {
        return None;
    }
    let unsafe_entries = timeline
        .danger_zone_entries
        .iter()
        .filter(|e| !e.had_vision)
        .count();
    (unsafe_entries > 2).then(|| {
        CoachingTag::new(
            "top-overextend",
            "positioning",
            "Overextending without vision",
            Severity::Warning,
            "TOP",
            format!(
                "Entered dangerous zones {unsafe_entries} times without ward coverage. Ward river/tribush before extending."
            ),
            ctx.match_evidence(),
        )
    })
}

fn top_low_damage(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.damage_share < 0.15).then(|| {
        CoachingTag::new(
            "top-low-damage",
            "combat",
            "Low damage contribution",
            Severity::Info,
            "TOP",
            format!(
                "Only {:.0}% of team damage. Consider more aggressive plays or itemization.",
                ctx.base.damage_share * 100.0
            ),
            ctx.match_evidence(),
        )
    })
}

fn top_tower_pressure(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.participant.turret_kills >= 3).then(|| {
        CoachingTag::new(
            "top-tower-pressure",
            "objectives",
            "Strong turret pressure",
            Severity::Strength,
            "TOP",
            format!(
                "Took {} turrets, excellent split push pressure.",
                ctx.participant.turret_kills
            ),
            ctx.match_evidence(),
        )
    })
}

// ─── Jungle ───

fn jungle_no_dragons(ctx: &RuleContext) -> Option<CoachingTag> {
    let team = ctx.summary.team(ctx.participant.team_id)?;
    (team.objectives.dragon.kills == 0 && ctx.summary.info.game_duration > 1_200).then(|| {
        CoachingTag::new(
            "jg-no-dragons",
            "objectives",
            "No dragons secured",
            Severity::Critical,
            "JUNGLE",
            "Team didn't secure any dragons. Prioritize dragon control with vision setup 1 min before spawn.",
            ctx.match_evidence(),
        )
    })
}

fn jungle_dragon_control(ctx: &RuleContext) -> Option<CoachingTag> {
    let team = ctx.summary.team(ctx.participant.team_id)?;
    let dragons = team.objectives.dragon.kills;
    (dragons >= 4).then(|| {
        CoachingTag::new(
            "jg-dragon-control",
            "objectives",
            "Excellent dragon control",
            Severity::Strength,
            "JUNGLE",
            format!("Secured {dragons} dragons, strong objective control."),
            ctx.match_evidence(),
        )
    })
}

fn jungle_baron_secured(ctx: &RuleContext) -> Option<CoachingTag> {
    let team = ctx.summary.team(ctx.participant.team_id)?;
    let barons = team.objectives.baron.kills;
    (barons >= 1).then(|| {
        CoachingTag::new(
            "jg-baron-secured",
            "objectives",
            "Baron secured",
            Severity::Strength,
            "JUNGLE",
            format!("Secured {barons} Baron(s)."),
            ctx.match_evidence(),
        )
    })
}

fn jungle_low_farm(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.cs_per_min < 4.5).then(|| {
        CoachingTag::new(
            "jg-low-farm",
            "farming",
            "Low jungle farm",
            Severity::Info,
            "JUNGLE",
            format!(
                "{:.1} CS/min. Consider clearing more efficiently between ganks.",
                ctx.base.cs_per_min
            ),
            ctx.match_evidence(),
        )
    })
}

fn jungle_low_impact(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.kill_participation < 0.4).then(|| {
        CoachingTag::new(
            "jg-low-impact",
            "teamplay",
            "Low map impact",
            Severity::Warning,
            "JUNGLE",
            format!(
                "KP of {:.0}%. Aim for 50%+ by ganking more or joining fights.",
                ctx.base.kill_participation * 100.0
            ),
            ctx.match_evidence(),
        )
    })
}

fn jungle_steals(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.participant.objectives_stolen > 0).then(|| {
        CoachingTag::new(
            "jg-steals",
            "objectives",
            "Objective steal!",
            Severity::Strength,
            "JUNGLE",
            format!(
                "Stole {} objective(s), clutch plays.",
                ctx.participant.objectives_stolen
            ),
            ctx.match_evidence(),
        )
    })
}

// ─── Mid ───

fn mid_behind_at_15(ctx: &RuleContext) -> Option<CoachingTag> {
    let timeline = ctx.timeline?;
    let at_15 = timeline
        .gold_diff_timeline
        .iter()
        .find(|t| (14.5..=15.5).contains(&t.timestamp))?;
    (at_15.value < -1_000.0).then(|| {
        CoachingTag::new(
            "mid-behind-15",
            "tempo",
            "Significantly behind at 15 min",
            Severity::Warning,
            "MIDDLE",
            format!(
                "{:.0} gold behind lane opponent at 15 min. Focus on safe farming and avoiding unnecessary deaths.",
                at_15.value
            ),
            vec![TagEvidence {
                match_id: ctx.match_id.to_string(),
                timestamp: Some(900.0),
                event: None,
                context: None,
            }],
        )
    })
}

fn mid_carry_damage(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.damage_share >= 0.3).then(|| {
        CoachingTag::new(
            "mid-carry-damage",
            "combat",
            "Carry-level damage output",
            Severity::Strength,
            "MIDDLE",
            format!(
                "{:.0}% of team damage, major carry performance.",
                ctx.base.damage_share * 100.0
            ),
            ctx.match_evidence(),
        )
    })
}

fn mid_first_blood(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.participant.first_blood_kill || ctx.participant.first_blood_assist).then(|| {
        CoachingTag::new(
            "mid-first-blood",
            "combat",
            "First blood involvement",
            Severity::Strength,
            "MIDDLE",
            "Contributed to first blood, good early aggression.",
            ctx.match_evidence(),
        )
    })
}

// ─── Bottom ───

fn adc_dies_before_objectives(ctx: &RuleContext) -> Option<CoachingTag> {
    let timeline = ctx.timeline?;
    let costly: Vec<_> = timeline
        .teamfights
        .iter()
        .filter(|tf| tf.objective.is_some() && tf.deaths > 0)
        .collect();
    (!costly.is_empty()).then(|| {
        CoachingTag::new(
            "adc-dies-before-obj",
            "positioning",
            "Dying before objectives",
            Severity::Critical,
            "BOTTOM",
            format!(
                "Died in {} objective fight(s). Stay alive for objectives, your DPS is critical.",
                costly.len()
            ),
            costly
                .iter()
                .map(|tf| {
                    TagEvidence::at(
                        ctx.match_id,
                        tf.timestamp,
                        format!("Died during {} fight", tf.objective.as_deref().unwrap_or("objective")),
                    )
                })
                .collect(),
        )
    })
}

fn adc_low_dpm(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.damage_per_min < 400.0).then(|| {
        CoachingTag::new(
            "adc-low-dpm",
            "combat",
            "Low damage output",
            Severity::Warning,
            "BOTTOM",
            format!(
                "{:.0} DPM is low for ADC. Keep auto-attacking in fights and hit the frontline.",
                ctx.base.damage_per_min
            ),
            ctx.match_evidence(),
        )
    })
}

fn adc_high_dpm(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.damage_per_min >= 700.0).then(|| {
        CoachingTag::new(
            "adc-high-dpm",
            "combat",
            "High damage output",
            Severity::Strength,
            "BOTTOM",
            format!(
                "{:.0} DPM, excellent damage contribution.",
                ctx.base.damage_per_min
            ),
            ctx.match_evidence(),
        )
    })
}

fn adc_pentakill(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.participant.penta_kills > 0).then(|| {
        CoachingTag::new(
            "adc-penta",
            "combat",
            "PENTAKILL!",
            Severity::Strength,
            "BOTTOM",
            "Got a pentakill, legendary performance!",
            ctx.match_evidence(),
        )
    })
}

fn adc_quadrakill(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.participant.penta_kills == 0 && ctx.participant.quadra_kills > 0).then(|| {
        CoachingTag::new(
            "adc-quadra",
            "combat",
            "Quadra Kill",
            Severity::Strength,
            "BOTTOM",
            "Scored a quadra kill.",
            ctx.match_evidence(),
        )
    })
}

// ─── Support ───

fn support_low_wards(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.wards_placed < 10 && ctx.summary.info.game_duration > 1_200).then(|| {
        CoachingTag::new(
            "sup-low-wards",
            "vision",
            "Not enough wards placed",
            Severity::Critical,
            "UTILITY",
            format!(
                "Only {} wards placed. Supports should place 20+ wards per game.",
                ctx.base.wards_placed
            ),
            ctx.match_evidence(),
        )
    })
}

fn support_ward_clearing(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.wards_killed >= 5).then(|| {
        CoachingTag::new(
            "sup-ward-clearing",
            "vision",
            "Good ward clearing",
            Severity::Strength,
            "UTILITY",
            format!(
                "Cleared {} enemy wards, excellent vision denial.",
                ctx.base.wards_killed
            ),
            ctx.match_evidence(),
        )
    })
}

fn support_high_kp(ctx: &RuleContext) -> Option<CoachingTag> {
    (ctx.base.kill_participation >= 0.65).then(|| {
        CoachingTag::new(
            "sup-high-kp",
            "teamplay",
            "Excellent kill participation",
            Severity::Strength,
            "UTILITY",
            format!(
                "{:.0}% KP, consistently involved in team plays.",
                ctx.base.kill_participation * 100.0
            ),
            ctx.match_evidence(),
        )
    })
}

fn support_warding_deaths(ctx: &RuleContext) -> Option<CoachingTag> {
    let timeline = ctx.timeline?;
    let warding_deaths: Vec<_> = timeline
        .punishable_deaths
        .iter()
        .filter(|d| matches!(d.zone, Zone::River | Zone::EnemyJungle))
        .collect();
    (!warding_deaths.is_empty()).then(|| {
        CoachingTag::new(
            "sup-warding-deaths",
            "vision",
            "Dying while warding",
            Severity::Warning,
            "UTILITY",
            format!(
                "Died {} time(s) in river/enemy jungle, likely while warding. Ward with teammates nearby.",
                warding_deaths.len()
            ),
            warding_deaths
                .iter()
                .map(|d| TagEvidence::at(ctx.match_id, d.timestamp, d.description.clone()))
                .collect(),
        )
    })
}

// ─── Timeline ───

fn punishable_deaths(ctx: &RuleContext) -> Option<CoachingTag> {
    let timeline = ctx.timeline?;
    let deaths = &timeline.punishable_deaths;
    (!deaths.is_empty()).then(|| {
        CoachingTag::new(
            "punishable-deaths",
            "positioning",
            format!("{} punishable death(s)", deaths.len()),
            if deaths.len() >= 3 {
                Severity::Critical
            } else {
                Severity::Warning
            },
            ctx.role_label(),
            format!(
                "Died {} time(s) in dangerous zones without vision or allies.",
                deaths.len()
            ),
            deaths
                .iter()
                .map(|d| TagEvidence::at(ctx.match_id, d.timestamp, d.description.clone()))
                .collect(),
        )
    })
}

fn bad_recalls(ctx: &RuleContext) -> Option<CoachingTag> {
    let timeline = ctx.timeline?;
    let recalls = &timeline.bad_recalls;
    (!recalls.is_empty()).then(|| {
        CoachingTag::new(
            "bad-recalls",
            "tempo",
            format!("{} poorly-timed recall(s)", recalls.len()),
            Severity::Warning,
            ctx.role_label(),
            format!(
                "Lost plates/CS during {} recall(s). Time recalls after pushing the wave.",
                recalls.len()
            ),
            recalls
                .iter()
                .map(|r| TagEvidence::at(ctx.match_id, r.timestamp, r.description.clone()))
                .collect(),
        )
    })
}

fn missed_objective_fights(ctx: &RuleContext) -> Option<CoachingTag> {
    let timeline = ctx.timeline?;
    let missed: Vec<_> = timeline
        .teamfights
        .iter()
        .filter(|tf| !tf.participated && tf.objective.is_some())
        .collect();
    (!missed.is_empty()).then(|| {
        CoachingTag::new(
            "missed-objective-fights",
            "objectives",
            format!("Missed {} objective fight(s)", missed.len()),
            Severity::Warning,
            ctx.role_label(),
            format!(
                "Wasn't present for {} fight(s) around major objectives.",
                missed.len()
            ),
            missed
                .iter()
                .map(|tf| {
                    TagEvidence::at(
                        ctx.match_id,
                        tf.timestamp,
                        format!("{} fight", tf.objective.as_deref().unwrap_or("objective")),
                    )
                })
                .collect(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::TeamfightEvent;
    use crate::models::MatchInfo;

    fn summary_for(participant: Participant, duration_s: u64) -> MatchSummary {
        MatchSummary {
            info: MatchInfo {
                game_duration: duration_s,
                participants: vec![participant],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn empty_timeline_metrics() -> TimelineMetrics {
        TimelineMetrics {
            wards_per_min: 0.0,
            control_ward_coverage: 0.0,
            danger_zone_entries: Vec::new(),
            punishable_deaths: Vec::new(),
            bad_recalls: Vec::new(),
            gold_diff_timeline: Vec::new(),
            xp_diff_timeline: Vec::new(),
            teamfights: Vec::new(),
        }
    }

    fn tag_ids(tags: &[CoachingTag]) -> Vec<&str> {
        tags.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn weak_vision_game_gets_flagged() {
        let me = Participant {
            participant_id: 1,
            team_id: 100,
            individual_position: "JUNGLE".to_string(),
            vision_score: 5,
            detector_wards_placed: 0,
            kills: 2,
            deaths: 2,
            assists: 2,
            ..Default::default()
        };
        let summary = summary_for(me.clone(), 1_800);
        let base = BaseMetrics::compute(&me, &summary);
        let ctx = RuleContext::new(&me, &summary, &base, None);
        let tags = generate_tags(&ctx);

        let ids = tag_ids(&tags);
        assert!(ids.contains(&"vision-low"));
        assert!(ids.contains(&"no-control-wards"));
        assert!(!ids.contains(&"vision-high"));
    }

    #[test]
    fn quadra_is_suppressed_by_penta() {
        let me = Participant {
            participant_id: 1,
            team_id: 100,
            individual_position: "BOTTOM".to_string(),
            penta_kills: 1,
            quadra_kills: 2,
            vision_score: 30,
            kills: 12,
            assists: 3,
            total_damage_dealt_to_champions: 30_000,
            detector_wards_placed: 4,
            total_minions_killed: 200,
            ..Default::default()
        };
        let summary = summary_for(me.clone(), 1_800);
        let base = BaseMetrics::compute(&me, &summary);
        let ctx = RuleContext::new(&me, &summary, &base, None);
        let tags = generate_tags(&ctx);

        let ids = tag_ids(&tags);
        assert!(ids.contains(&"adc-penta"));
        assert!(!ids.contains(&"adc-quadra"));
    }

    #[test]
    fn punishable_death_count_drives_severity() {
        let me = Participant {
            participant_id: 1,
            team_id: 100,
            individual_position: "MIDDLE".to_string(),
            vision_score: 40,
            detector_wards_placed: 3,
            deaths: 2,
            total_minions_killed: 180,
            ..Default::default()
        };
        let summary = summary_for(me.clone(), 1_800);
        let base = BaseMetrics::compute(&me, &summary);

        let mut metrics = empty_timeline_metrics();
        metrics.punishable_deaths = vec![
            crate::detectors::PunishableDeath {
                timestamp: 100.0,
                zone: Zone::River,
                had_vision: false,
                allies_nearby: 0,
                description: "d1".to_string(),
            };
            3
        ];
        let ctx = RuleContext::new(&me, &summary, &base, Some(&metrics));
        let tags = generate_tags(&ctx);

        let tag = tags.iter().find(|t| t.id == "punishable-deaths").unwrap();
        assert_eq!(tag.severity, Severity::Critical);
        assert_eq!(tag.evidence.len(), 3);
    }

    #[test]
    fn missed_objective_fights_need_an_objective() {
        let me = Participant {
            participant_id: 1,
            team_id: 100,
            individual_position: "TOP".to_string(),
            vision_score: 40,
            detector_wards_placed: 3,
            total_minions_killed: 200,
            ..Default::default()
        };
        let summary = summary_for(me.clone(), 1_800);
        let base = BaseMetrics::compute(&me, &summary);

        let mut metrics = empty_timeline_metrics();
        metrics.teamfights = vec![
            TeamfightEvent {
                timestamp: 600.0,
                duration: 10.0,
                objective: Some("DRAGON".to_string()),
                participated: false,
                kills: 0,
                deaths: 0,
                assists: 0,
                damage_dealt: 0,
            },
            TeamfightEvent {
                timestamp: 900.0,
                duration: 8.0,
                objective: None,
                participated: false,
                kills: 0,
                deaths: 0,
                assists: 0,
                damage_dealt: 0,
            },
        ];
        let ctx = RuleContext::new(&me, &summary, &base, Some(&metrics));
        let tags = generate_tags(&ctx);

        let tag = tags
            .iter()
            .find(|t| t.id == "missed-objective-fights")
            .unwrap();
        assert_eq!(tag.evidence.len(), 1);
        assert_eq!(tag.evidence[0].context.as_deref(), Some("DRAGON fight"));
    }

    #[test]
    fn low_kp_does_not_apply_to_top() {
        let me = Participant {
            participant_id: 1,
            team_id: 100,
            individual_position: "TOP".to_string(),
            vision_score: 40,
            detector_wards_placed: 3,
            kills: 0,
            deaths: 1,
            assists: 0,
            total_minions_killed: 200,
            ..Default::default()
        };
        let mut summary = summary_for(me.clone(), 1_800);
        summary.info.participants.push(Participant {
            participant_id: 2,
            team_id: 100,
            kills: 10,
            ..Default::default()
        });
        let base = BaseMetrics::compute(&me, &summary);
        assert!(base.kill_participation < 0.3);

        let ctx = RuleContext::new(&me, &summary, &base, None);
        assert!(!tag_ids(&generate_tags(&ctx)).contains(&"low-kp"));
    }
}
