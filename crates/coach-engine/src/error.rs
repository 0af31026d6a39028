//! Error taxonomy for provider access and analysis

use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by the telemetry provider gateway.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider throttled us. The retry-after duration has already
    /// been reported back to the rate limiter by the client.
    #[error("rate limited by provider, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Match, timeline, or participant does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The provider responded but the payload did not match the schema.
    #[error("malformed provider payload: {0}")]
    Validation(String),

    /// Transport failures and unexpected status codes.
    #[error("provider request failed: {0}")]
    Unknown(String),
}

/// Failures producing an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("participant {puuid} not present in match {match_id}")]
    ParticipantNotFound { match_id: String, puuid: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
