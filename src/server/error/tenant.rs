use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::client_error};

#[derive(Error, Debug)]
pub enum TenantError {
    #[error("Missing X-Tenant header")]
    MissingHeader,
    #[error("Invalid tenant code {0:?}: expected 2 to 20 upper-case letters, digits or underscores")]
    InvalidCode(String),
    #[error("Unknown tenant {0}")]
    NotFound(String),
    #[error("Tenant {0} is not active")]
    Inactive(String),
    #[error("Access to tenant {0} is not allowed for this user")]
    AccessDenied(String),
}

impl IntoResponse for TenantError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingHeader | Self::InvalidCode(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Inactive(_) | Self::AccessDenied(_) => StatusCode::FORBIDDEN,
        };

        client_error(status, ErrorDto::new(self.to_string()))
    }
}
