//! Typed coaching report produced by an external advisory model.
//!
//! The engine never generates these itself; it defines the shape and a
//! lenient parser for raw model output, which often arrives wrapped in
//! markdown code fences or surrounded by prose.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::coaching::TagEvidence;

/// Relative weight attached to a priority or practice item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Low,
    #[default]
    #[serde(other)]
    Medium,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachingPriority {
    pub rank: u32,
    pub area: String,
    pub impact: ImpactLevel,
    pub summary: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachingInsight {
    pub category: String,
    pub finding: String,
    pub evidence: Vec<TagEvidence>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeItem {
    pub goal: String,
    pub metric: String,
    pub target: String,
    pub priority: ImpactLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RoamAnalysisSummary {
    pub total_roams: u32,
    pub good_roams: u32,
    pub bad_roams: u32,
    pub avg_cost: f64,
    pub avg_reward: f64,
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// Full advisory report. `overall_score` is clamped to 1..=10 after
/// parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachingReport {
    pub overall_score: f64,
    pub priorities: Vec<CoachingPriority>,
    pub insights: Vec<CoachingInsight>,
    pub practice_plan: Vec<PracticeItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roam_analysis: Option<RoamAnalysisSummary>,
    pub measure_next: Vec<String>,
}

impl Default for CoachingReport {
    fn default() -> Self {
        Self {
            overall_score: 5.0,
            priorities: Vec::new(),
            insights: Vec::new(),
            practice_plan: Vec::new(),
            roam_analysis: None,
            measure_next: Vec::new(),
        }
    }
}

/// Parses raw advisory output into a [`CoachingReport`].
///
/// Strips markdown code fences and leading/trailing prose before
/// deserializing. Never errors: unparseable input yields a placeholder
/// report flagging the failure.
pub fn parse_coaching_report(raw: &str) -> CoachingReport {
    let json = extract_json(raw);
    match serde_json::from_str::<CoachingReport>(json) {
        Ok(mut report) => {
            report.overall_score = report.overall_score.clamp(1.0, 10.0);
            for (i, priority) in report.priorities.iter_mut().enumerate() {
                if priority.rank == 0 {
                    priority.rank = i as u32 + 1;
                }
            }
            report
        }
        Err(err) => {
            warn!(error = %err, "failed to parse coaching report");
            placeholder_report()
        }
    }
}

fn placeholder_report() -> CoachingReport {
    CoachingReport {
        priorities: vec![CoachingPriority {
            rank: 1,
            area: "Analysis Error".to_string(),
            impact: ImpactLevel::High,
            summary: "Unable to parse coaching analysis".to_string(),
            details: "The advisory response could not be parsed. Please try again.".to_string(),
        }],
        ..CoachingReport::default()
    }
}

/// Trims the payload down to the JSON object: the body of the first
/// code fence if one is present, then the outermost brace pair.
fn extract_json(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(fence) = text.find("```") {
        let after = &text[fence + 3..];
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after[body_start..];
        if let Some(end) = body.find("```") {
            text = body[..end].trim();
        }
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if last > first => &text[first..=last],
        _ => text,
    }
}
