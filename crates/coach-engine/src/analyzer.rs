//! End-to-end match analysis.
//!
//! Takes raw match (and optionally timeline) data, runs the metric and
//! detector passes, the coaching rules, and assembles the feature pack.

use crate::coaching::{generate_tags, RuleContext};
use crate::detectors::RoamDetector;
use crate::error::AnalysisError;
use crate::feature_pack::FeaturePack;
use crate::gateway::client::ProviderClient;
use crate::gateway::regions::Platform;
use crate::metrics::{BaseMetrics, TimelineAggregator};
use crate::models::{MatchSummary, Timeline};
use crate::observability::{EngineMetrics, EventLogger};
use std::time::Instant;

/// Player rank context attached to pack metadata when known.
#[derive(Debug, Clone, Default)]
pub struct RankContext {
    pub tier: Option<String>,
    pub rank: Option<String>,
}

pub struct MatchAnalyzer {
    timeline_metrics: TimelineAggregator,
    roam_detector: RoamDetector,
    metrics: EngineMetrics,
    logger: EventLogger,
}

impl Default for MatchAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchAnalyzer {
    pub fn new() -> Self {
        Self {
            timeline_metrics: TimelineAggregator::default(),
            roam_detector: RoamDetector::default(),
            metrics: EngineMetrics::new(),
            logger: EventLogger::new("coach-engine"),
        }
    }

    /// Analyze one participant of an already-fetched match. Timeline
    /// data is optional; without it only the base metrics and the
    /// stats-driven coaching rules apply.
    pub fn analyze(
        &self,
        summary: &MatchSummary,
        timeline: Option<&Timeline>,
        puuid: &str,
        rank: RankContext,
    ) -> Result<FeaturePack, AnalysisError> {
        let started = Instant::now();
        let participant = summary.participant_by_puuid(puuid).ok_or_else(|| {
            AnalysisError::ParticipantNotFound {
                match_id: summary.match_id().to_string(),
                puuid: puuid.to_string(),
            }
        })?;

        let base = BaseMetrics::compute(participant, summary);
        let timeline_metrics =
            timeline.map(|tl| self.timeline_metrics.compute(tl, summary, participant));
        let roam_events = timeline
            .map(|tl| self.roam_detector.detect(tl, participant))
            .unwrap_or_default();

        let ctx = RuleContext::new(participant, summary, &base, timeline_metrics.as_ref());
        let tags = generate_tags(&ctx);

        self.metrics.inc_analyses();
        self.metrics.add_tags_generated(tags.len() as u64);
        self.metrics
            .observe_analysis_latency(started.elapsed().as_secs_f64());
        self.logger.log_analysis(
            summary.match_id(),
            puuid,
            participant.role().label(),
            tags.len(),
            roam_events.len(),
            timeline.is_some(),
        );

        Ok(FeaturePack::assemble(
            summary,
            participant,
            base,
            timeline_metrics,
            tags,
            roam_events,
            rank.tier,
            rank.rank,
        ))
    }

    /// Fetch a match from the provider and analyze it. A failed
    /// timeline fetch degrades to a base-only analysis instead of
    /// failing the whole request.
    pub async fn analyze_remote(
        &self,
        client: &ProviderClient,
        platform: Platform,
        match_id: &str,
        puuid: &str,
        rank: RankContext,
    ) -> Result<FeaturePack, AnalysisError> {
        let summary = client.get_match(platform, match_id).await?;
        let timeline = match client.get_timeline(platform, match_id).await {
            Ok(timeline) => Some(timeline),
            Err(err) => {
                self.metrics.inc_timeline_fallback();
                self.logger.log_timeline_fallback(match_id, &err.to_string());
                None
            }
        };
        self.analyze(&summary, timeline.as_ref(), puuid, rank)
    }
}
