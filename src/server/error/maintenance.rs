use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{client_error, InternalServerError},
};

#[derive(Error, Debug)]
pub enum MaintenanceError {
    #[error("Invalid backup file name {0:?}")]
    InvalidBackupName(String),
    #[error("Backup {0} not found")]
    BackupNotFound(String),
    #[error("Backup {0} cannot be restored: only plain .sql backups are supported")]
    UnsupportedFormat(String),
    #[error("{tool} failed: {message}")]
    CommandFailed { tool: String, message: String },
    #[error("Operation requires a Postgres database")]
    UnsupportedBackend,
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
}

impl IntoResponse for MaintenanceError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidBackupName(_) | Self::UnsupportedFormat(_) => {
                client_error(StatusCode::BAD_REQUEST, ErrorDto::new(self.to_string()))
            }
            Self::BackupNotFound(_) => {
                client_error(StatusCode::NOT_FOUND, ErrorDto::new(self.to_string()))
            }
            Self::CommandFailed { .. } | Self::UnsupportedBackend | Self::InvalidDatabaseUrl(_) => {
                InternalServerError(self).into_response()
            }
        }
    }
}
