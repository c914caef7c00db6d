use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::client_error};

#[derive(Error, Debug)]
pub enum ResilienceError {
    #[error("Circuit breaker {0} is open")]
    CircuitOpen(String),
    #[error("Call through circuit breaker {name} timed out after {after:?}")]
    Timeout { name: String, after: Duration },
    #[error("Too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl IntoResponse for ResilienceError {
    fn into_response(self) -> Response {
        match self {
            Self::RateLimited { retry_after_secs } => {
                let mut resp = client_error(
                    StatusCode::TOO_MANY_REQUESTS,
                    ErrorDto::new(self.to_string()),
                );
                resp.headers_mut()
                    .insert(header::RETRY_AFTER, retry_after_secs.into());

                resp
            }
            Self::CircuitOpen(_) | Self::Timeout { .. } => {
                tracing::error!("{}", self);

                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorDto::new("Service temporarily unavailable")),
                )
                    .into_response()
            }
        }
    }
}
