//! Integration tests for the service API endpoints

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use coach_engine::{
    analyzer::{MatchAnalyzer, RankContext},
    error::AnalysisError,
    health::{components, ComponentStatus, HealthRegistry},
    models::{MatchInfo, MatchMetadata, MatchSummary, Participant, Timeline},
    observability::EngineMetrics,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: EngineMetrics,
    pub analyzer: Arc<MatchAnalyzer>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    summary: MatchSummary,
    #[serde(default)]
    timeline: Option<Timeline>,
    puuid: String,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    rank: Option<String>,
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

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
        Err(err @ AnalysisError::ParticipantNotFound { .. }) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
        }
        Err(err) => {
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}

fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/analyze", post(analyze))
        .with_state(state)
}

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::GATEWAY).await;
    health_registry.register(components::ANALYZER).await;

    let state = Arc::new(AppState {
        health_registry,
        metrics: EngineMetrics::new(),
        analyzer: Arc::new(MatchAnalyzer::new()),
    });
    let router = create_test_router(state.clone());

    (router, state)
}

fn sample_summary() -> MatchSummary {
    MatchSummary {
        metadata: MatchMetadata {
            match_id: "NA1_42".to_string(),
            participants: vec!["p1".to_string()],
        },
        info: MatchInfo {
            game_duration: 1_800,
            game_version: "14.1.1".to_string(),
            queue_id: 420,
            participants: vec![Participant {
                participant_id: 1,
                team_id: 100,
                puuid: "p1".to_string(),
                individual_position: "MIDDLE".to_string(),
                champion_name: "Ahri".to_string(),
                kills: 4,
                deaths: 3,
                assists: 6,
                vision_score: 28,
                detector_wards_placed: 2,
                total_minions_killed: 180,
                ..Default::default()
            }],
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["gateway"].is_object());
    assert!(health["components"]["analyzer"].is_object());
}

#[tokio::test]
async fn test_healthz_returns_ok_when_degraded() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_degraded(components::GATEWAY, "provider throttling")
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Degraded still returns 200 (operational)
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_unhealthy(components::GATEWAY, "provider unreachable")
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_readyz_returns_503_when_not_ready() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let readiness: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(readiness["ready"], false);
}

#[tokio::test]
async fn test_readyz_returns_ok_when_ready() {
    let (app, state) = setup_test_app().await;

    state.health_registry.set_ready(true).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, state) = setup_test_app().await;

    state.metrics.inc_analyses();
    state.metrics.observe_analysis_latency(0.002);
    state.metrics.inc_provider_request("americas", "ok");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("coach_analyses_total"));
    assert!(metrics_text.contains("coach_analysis_latency_seconds_bucket"));
    assert!(metrics_text.contains("coach_provider_requests_total"));
}

#[tokio::test]
async fn test_analyze_returns_a_feature_pack() {
    let (app, _state) = setup_test_app().await;

    let request_body = json!({
        "summary": sample_summary(),
        "puuid": "p1",
        "tier": "GOLD",
        "rank": "II",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let pack: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(pack["metadata"]["matchId"], "NA1_42");
    assert_eq!(pack["metadata"]["champion"], "Ahri");
    assert_eq!(pack["metadata"]["role"], "MIDDLE");
    assert_eq!(pack["metadata"]["tier"], "GOLD");
    assert_eq!(pack["metadata"]["queueType"], "Ranked Solo/Duo");
    assert!(pack["coachingTags"].is_array());
    assert_eq!(pack["windows"].as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn test_analyze_unknown_participant_is_404() {
    let (app, _state) = setup_test_app().await;

    let request_body = json!({
        "summary": sample_summary(),
        "puuid": "nobody",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_with_timeline_includes_positional_metrics() {
    let (app, _state) = setup_test_app().await;

    let request_body = json!({
        "summary": sample_summary(),
        "timeline": Timeline::default(),
        "puuid": "p1",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let pack: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(pack["aggregates"]["timeline"].is_object());
}
