//! Error types for the TopSteel server application.
//!
//! Each concern has its own `thiserror` enum; all of them convert into [`Error`] through
//! `#[from]` so services can use `?` freely. Every error implements `IntoResponse`:
//! client errors (4xx) are logged as warnings, server errors (5xx) as errors, and the
//! body is always an [`ErrorDto`].

pub mod auth;
pub mod business;
pub mod config;
pub mod maintenance;
pub mod resilience;
pub mod retry;
pub mod tenant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, business::BusinessError, config::ConfigError,
        maintenance::MaintenanceError, resilience::ResilienceError, tenant::TenantError,
    },
};

/// Main error type for the TopSteel server application.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Authentication errors (bearer token, role checks)
/// - Tenant resolution errors (`X-Tenant` header, societe status)
/// - Business rule violations (not found, conflicts, invalid transitions, validation)
/// - Resilience errors (rate limiting, open circuit breakers, timeouts)
/// - Maintenance errors (backup files, external tools)
/// - External library errors (database, Redis, scheduler, I/O)
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error(transparent)]
    AuthError(#[from] AuthError),
    #[error(transparent)]
    TenantError(#[from] TenantError),
    #[error(transparent)]
    BusinessError(#[from] BusinessError),
    #[error(transparent)]
    ResilienceError(#[from] ResilienceError),
    #[error(transparent)]
    MaintenanceError(#[from] MaintenanceError),
    /// Internal error indicating a bug in the server code.
    #[error("Internal error: {0}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Valkey/Redis error raised by the rate limiter backend.
    #[error(transparent)]
    RedisError(#[from] fred::prelude::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Prometheus recorder construction error.
    #[error(transparent)]
    MetricsError(#[from] metrics_exporter_prometheus::BuildError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::TenantError(err) => err.into_response(),
            Self::BusinessError(err) => err.into_response(),
            Self::ResilienceError(err) => err.into_response(),
            Self::MaintenanceError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Builds a 4xx JSON response and logs it as a warning.
pub(crate) fn client_error(status: StatusCode, body: ErrorDto) -> Response {
    tracing::warn!(status = status.as_u16(), error = %body.error, "Request rejected");

    (status, Json(body)).into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the full error message but returns a generic message to the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto::new("Internal server error")),
        )
            .into_response()
    }
}
