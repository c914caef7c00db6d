use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

/// Startup configuration problems. Reported before the server binds.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
    #[error("TENANT_DATABASE_URL_TEMPLATE must contain the {{tenant}} placeholder")]
    MissingTenantPlaceholder,
    #[error("JWT_SECRET must be at least {min_len} bytes long")]
    WeakJwtSecret { min_len: usize },
    #[error("Rate limit window and request budget must be greater than zero")]
    EmptyRateLimit,
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
