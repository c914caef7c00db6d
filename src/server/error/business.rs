use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    model::api::{ErrorDto, FieldError},
    server::error::client_error,
};

/// Violations of business rules, returned to the caller as 4xx responses.
#[derive(Error, Debug)]
pub enum BusinessError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
}

impl BusinessError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns `Err(Validation)` when `errors` is not empty.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation(errors))
        }
    }
}

impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { .. } => {
                client_error(StatusCode::NOT_FOUND, ErrorDto::new(self.to_string()))
            }
            Self::Conflict(message) => client_error(StatusCode::CONFLICT, ErrorDto::new(message)),
            Self::Forbidden(message) => {
                client_error(StatusCode::FORBIDDEN, ErrorDto::new(message))
            }
            Self::InvalidState(message) => {
                client_error(StatusCode::BAD_REQUEST, ErrorDto::new(message))
            }
            Self::Validation(errors) => client_error(
                StatusCode::BAD_REQUEST,
                ErrorDto {
                    error: "Validation failed".to_string(),
                    details: Some(errors),
                },
            ),
        }
    }
}
