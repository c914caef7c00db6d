use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::client_error};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("Role {role} is not allowed to access this resource")]
    InsufficientRole { role: String },
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingToken | Self::InvalidToken(_) => {
                tracing::debug!("{}", self);

                client_error(
                    StatusCode::UNAUTHORIZED,
                    ErrorDto::new("Authentication required"),
                )
            }
            Self::InsufficientRole { .. } => {
                client_error(StatusCode::FORBIDDEN, ErrorDto::new(self.to_string()))
            }
        }
    }
}
