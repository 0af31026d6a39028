//! Observability infrastructure for the coaching engine
//!
//! Provides:
//! - Prometheus metrics (provider request outcomes, gateway wait time, analysis latency)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter, register_int_counter_vec,
    Histogram, HistogramVec, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for analysis latency (seconds).
const ANALYSIS_LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Histogram buckets for time spent waiting on the rate limiter (seconds).
const GATEWAY_WAIT_BUCKETS: &[f64] = &[0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

struct EngineMetricsInner {
    provider_requests_total: IntCounterVec,
    throttle_events_total: IntCounterVec,
    gateway_wait_seconds: HistogramVec,
    analyses_total: IntCounter,
    analysis_latency_seconds: Histogram,
    timeline_fallbacks_total: IntCounter,
    tags_generated_total: IntCounter,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            provider_requests_total: register_int_counter_vec!(
                "coach_provider_requests_total",
                "Provider API requests by region and outcome",
                &["region", "outcome"]
            )
            .expect("Failed to register provider_requests_total"),

            throttle_events_total: register_int_counter_vec!(
                "coach_throttle_events_total",
                "429 responses received from the provider, by region",
                &["region"]
            )
            .expect("Failed to register throttle_events_total"),

            gateway_wait_seconds: register_histogram_vec!(
                "coach_gateway_wait_seconds",
                "Time spent waiting for a rate limit slot",
                &["region"],
                GATEWAY_WAIT_BUCKETS.to_vec()
            )
            .expect("Failed to register gateway_wait_seconds"),

            analyses_total: register_int_counter!(
                "coach_analyses_total",
                "Total number of feature packs assembled"
            )
            .expect("Failed to register analyses_total"),

            analysis_latency_seconds: register_histogram!(
                "coach_analysis_latency_seconds",
                "Time spent analyzing one participant's match",
                ANALYSIS_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register analysis_latency_seconds"),

            timeline_fallbacks_total: register_int_counter!(
                "coach_timeline_fallbacks_total",
                "Analyses that proceeded without timeline data"
            )
            .expect("Failed to register timeline_fallbacks_total"),

            tags_generated_total: register_int_counter!(
                "coach_tags_generated_total",
                "Total number of coaching tags emitted"
            )
            .expect("Failed to register tags_generated_total"),
        }
    }
}

/// Engine metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EngineMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record one provider request with its outcome label
    /// ("ok", "throttled", "not_found", "error").
    pub fn inc_provider_request(&self, region: &str, outcome: &str) {
        self.inner()
            .provider_requests_total
            .with_label_values(&[region, outcome])
            .inc();
    }

    /// Record a 429 from the provider.
    pub fn inc_throttle_event(&self, region: &str) {
        self.inner()
            .throttle_events_total
            .with_label_values(&[region])
            .inc();
    }

    /// Record time spent waiting for a rate limit slot.
    pub fn observe_gateway_wait(&self, region: &str, duration_secs: f64) {
        self.inner()
            .gateway_wait_seconds
            .with_label_values(&[region])
            .observe(duration_secs);
    }

    /// Record one completed analysis.
    pub fn inc_analyses(&self) {
        self.inner().analyses_total.inc();
    }

    /// Record analysis latency.
    pub fn observe_analysis_latency(&self, duration_secs: f64) {
        self.inner().analysis_latency_seconds.observe(duration_secs);
    }

    /// Record an analysis that ran without timeline data.
    pub fn inc_timeline_fallback(&self) {
        self.inner().timeline_fallbacks_total.inc();
    }

    /// Record emitted coaching tags.
    pub fn add_tags_generated(&self, count: u64) {
        self.inner().tags_generated_total.inc_by(count);
    }
}

/// Structured logger for engine events
///
/// Provides consistent JSON-formatted logging for analyses, throttle
/// events, and lifecycle transitions.
#[derive(Clone)]
pub struct EventLogger {
    service: String,
}

impl EventLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Log one completed analysis
    pub fn log_analysis(
        &self,
        match_id: &str,
        puuid: &str,
        role: &str,
        tag_count: usize,
        roam_count: usize,
        with_timeline: bool,
    ) {
        info!(
            event = "analysis_completed",
            service = %self.service,
            match_id = %match_id,
            puuid = %puuid,
            role = %role,
            tag_count = tag_count,
            roam_count = roam_count,
            with_timeline = with_timeline,
            "Feature pack assembled"
        );
    }

    /// Log a throttle event from the provider
    pub fn log_throttle(&self, region: &str, retry_after_secs: u64) {
        warn!(
            event = "provider_throttled",
            service = %self.service,
            region = %region,
            retry_after_secs = retry_after_secs,
            "Provider returned 429, blocking region"
        );
    }

    /// Log an analysis that degraded to base metrics only
    pub fn log_timeline_fallback(&self, match_id: &str, reason: &str) {
        warn!(
            event = "timeline_fallback",
            service = %self.service,
            match_id = %match_id,
            reason = %reason,
            "Timeline unavailable, analyzing without positional metrics"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            "Coaching service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Coaching service shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_metrics_creation() {
        // Note: This test may fail if run multiple times in the same process
        // due to Prometheus global registry. In practice, metrics are created once.
        let metrics = EngineMetrics::new();

        metrics.inc_provider_request("americas", "ok");
        metrics.inc_throttle_event("americas");
        metrics.observe_gateway_wait("americas", 0.05);
        metrics.inc_analyses();
        metrics.observe_analysis_latency(0.002);
        metrics.inc_timeline_fallback();
        metrics.add_tags_generated(4);
    }

    #[test]
    fn test_event_logger_creation() {
        let logger = EventLogger::new("coach-service");
        assert_eq!(logger.service, "coach-service");
    }
}
