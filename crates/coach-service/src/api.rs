//! HTTP API: health checks, Prometheus metrics, and match analysis

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use coach_engine::{
    analyzer::{MatchAnalyzer, RankContext},
    error::{AnalysisError, ProviderError},
    gateway::{Platform, ProviderClient},
    health::{ComponentStatus, HealthRegistry},
    models::{MatchSummary, Timeline},
    observability::EngineMetrics,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: EngineMetrics,
    pub analyzer: Arc<MatchAnalyzer>,
    /// Absent when no provider API key is configured.
    pub client: Option<Arc<ProviderClient>>,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: EngineMetrics,
        analyzer: Arc<MatchAnalyzer>,
        client: Option<Arc<ProviderClient>>,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            analyzer,
            client,
        }
    }
}

/// Analysis request carrying already-fetched match data.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub summary: MatchSummary,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    pub puuid: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub puuid: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Analyze already-fetched match data
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    let rank = RankContext {
        tier: request.tier,
        rank: request.rank,
    };
    match state.analyzer.analyze(
        &request.summary,
        request.timeline.as_ref(),
        &request.puuid,
        rank,
    ) {
        Ok(pack) => Json(pack).into_response(),
        Err(err) => analysis_error_response(err),
    }
}

/// Fetch a match from the provider and analyze it
async fn analyze_remote(
    State(state): State<Arc<AppState>>,
    Path((platform, match_id)): Path<(String, String)>,
    Query(query): Query<AnalyzeQuery>,
) -> Response {
    let Some(client) = state.client.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "no provider API key configured",
        );
    };
    let platform: Platform = match platform.parse() {
        Ok(platform) => platform,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    let rank = RankContext {
        tier: query.tier,
        rank: query.rank,
    };
    match state
        .analyzer
        .analyze_remote(client, platform, &match_id, &query.puuid, rank)
        .await
    {
        Ok(pack) => Json(pack).into_response(),
        Err(err) => analysis_error_response(err),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn analysis_error_response(err: AnalysisError) -> Response {
    match err {
        AnalysisError::ParticipantNotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, &err.to_string())
        }
        AnalysisError::Provider(provider) => match provider {
            ProviderError::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", retry_after.as_secs().to_string())],
                Json(json!({ "error": "provider rate limited" })),
            )
                .into_response(),
            ProviderError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, &provider.to_string())
            }
            ProviderError::Validation(_) => {
                error_response(StatusCode::BAD_GATEWAY, &provider.to_string())
            }
            ProviderError::Unknown(_) => {
                error_response(StatusCode::BAD_GATEWAY, &provider.to_string())
            }
        },
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/analyze", post(analyze))
        .route("/analyze/:platform/:match_id", get(analyze_remote))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
