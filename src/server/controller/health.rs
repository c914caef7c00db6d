use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::health::{HealthDto, HealthStatus, LivenessDto},
    server::{metrics::GaugeSnapshot, model::app::AppState, service::health::HealthService},
};

pub static HEALTH_TAG: &str = "health";

/// Status of the shared database, tenant connections and circuit breakers
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Healthy or degraded", body = HealthDto),
        (status = 503, description = "Shared database unreachable", body = HealthDto)
    ),
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let health = HealthService::new(&state).health().await;
    let status = match health.status {
        HealthStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Ok | HealthStatus::Degraded => StatusCode::OK,
    };

    (status, Json(health))
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = HEALTH_TAG,
    responses((status = 200, description = "Process is running", body = LivenessDto)),
)]
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, Json(LivenessDto::new("ok")))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Shared database reachable", body = LivenessDto),
        (status = 503, description = "Shared database unreachable", body = LivenessDto)
    ),
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if HealthService::new(&state).ready().await {
        (StatusCode::OK, Json(LivenessDto::new("ready")))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(LivenessDto::new("unavailable")))
    }
}

/// Prometheus text exposition
#[utoipa::path(
    get,
    path = "/metrics",
    tag = HEALTH_TAG,
    responses((status = 200, description = "Metrics in text format", content_type = "text/plain", body = String)),
)]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = GaugeSnapshot {
        breakers: state
            .breakers
            .all()
            .into_iter()
            .map(|breaker| (breaker.name().to_string(), breaker.state()))
            .collect(),
        tenant_connections: state.tenants.count().await,
        tenant_connections_opened: state.tenants.opened_total(),
        rate_limit_blocked: state.rate_limiter.blocked_total(),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(snapshot),
    )
}
