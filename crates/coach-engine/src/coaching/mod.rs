//! Coaching tag generation.
//!
//! A fixed, ordered table of rules inspects one participant's metrics
//! and emits tags: things done well, things to fix, with pointers into
//! the match as evidence.

pub mod rules;

use serde::{Deserialize, Serialize};

pub use rules::{generate_tags, RuleContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Strength,
}

impl Severity {
    /// Display form used inside event descriptions.
    pub fn upper_label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Strength => "STRENGTH",
        }
    }
}

/// Pointer into the match backing one tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEvidence {
    pub match_id: String,
    /// Seconds from match start, when the evidence is time-anchored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl TagEvidence {
    pub fn match_only(match_id: &str) -> Self {
        Self {
            match_id: match_id.to_string(),
            timestamp: None,
            event: None,
            context: None,
        }
    }

    pub fn at(match_id: &str, timestamp: f64, context: String) -> Self {
        Self {
            match_id: match_id.to_string(),
            timestamp: Some(timestamp),
            event: None,
            context: Some(context),
        }
    }
}

/// One piece of coaching feedback tied to a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingTag {
    pub id: String,
    pub category: String,
    pub label: String,
    pub severity: Severity,
    pub role: String,
    pub description: String,
    pub evidence: Vec<TagEvidence>,
}

impl CoachingTag {
    fn new(
        id: &str,
        category: &str,
        label: impl Into<String>,
        severity: Severity,
        role: &str,
        description: impl Into<String>,
        evidence: Vec<TagEvidence>,
    ) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            label: label.into(),
            severity,
            role: role.to_string(),
            description: description.into(),
            evidence,
        }
    }
}
