use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        admin::{CircuitBreakerDto, RateLimitStatsDto},
        api::{ErrorDto, OperationResultDto},
    },
    server::{
        error::{business::BusinessError, Error},
        model::{app::AppState, auth::AuthUser},
    },
};

pub static RESILIENCE_TAG: &str = "resilience";

#[utoipa::path(
    get,
    path = "/api/admin/circuit-breakers",
    tag = RESILIENCE_TAG,
    responses(
        (status = 200, description = "State and counters of every breaker", body = Vec<CircuitBreakerDto>),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn list_circuit_breakers(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let breakers: Vec<CircuitBreakerDto> = state
        .breakers
        .all()
        .into_iter()
        .map(|breaker| breaker.snapshot())
        .collect();

    Ok((StatusCode::OK, Json(breakers)))
}

/// Force a breaker back to closed and clear its window
#[utoipa::path(
    post,
    path = "/api/admin/circuit-breakers/{name}/reset",
    tag = RESILIENCE_TAG,
    params(("name" = String, Path, example = "tenant-database")),
    responses(
        (status = 200, description = "Breaker reset", body = OperationResultDto),
        (status = 404, description = "Unknown breaker", body = ErrorDto)
    ),
)]
pub async fn reset_circuit_breaker(
    State(state): State<AppState>,
    user: AuthUser,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let breaker = state
        .breakers
        .get(&name)
        .ok_or_else(|| BusinessError::not_found("Circuit breaker", &name))?;
    breaker.reset();

    Ok((
        StatusCode::OK,
        Json(OperationResultDto::ok(format!("Circuit breaker {} reset", name))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/rate-limit/stats",
    tag = RESILIENCE_TAG,
    responses(
        (status = 200, description = "Rate limiter counters", body = RateLimitStatsDto),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn rate_limit_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    Ok((StatusCode::OK, Json(state.rate_limiter.stats())))
}

/// Clear the window and violations of an identifier such as `ip:203.0.113.9` or `user:42`
#[utoipa::path(
    delete,
    path = "/api/admin/rate-limit/{identifier}",
    tag = RESILIENCE_TAG,
    params(("identifier" = String, Path)),
    responses(
        (status = 200, description = "Identifier reset", body = OperationResultDto),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn reset_rate_limit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    state.rate_limiter.reset(&identifier).await?;

    Ok((
        StatusCode::OK,
        Json(OperationResultDto::ok(format!("Rate limit of {} reset", identifier))),
    ))
}
