use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        admin::{
            BackupDto, BackupRequestDto, BackupResultDto, ConnectionStatusDto, IntegrityReportDto,
            RestoreRequestDto,
        },
        api::{ErrorDto, OperationResultDto},
    },
    server::{
        error::Error,
        model::{app::AppState, auth::AuthUser, tenant::Tenant},
        service::{
            backup::BackupService,
            database::{shared_tables, tenant_tables, DatabaseService, SHARED_DATABASE},
        },
    },
};

pub static DATABASE_TAG: &str = "database";

fn backups(state: &AppState) -> BackupService<'_> {
    BackupService::new(&state.db, &state.backup, &state.breakers, &state.tenants)
}

/// Compare the shared database schema with the entity model
#[utoipa::path(
    get,
    path = "/api/admin/database/integrity",
    tag = DATABASE_TAG,
    responses(
        (status = 200, description = "Integrity report", body = IntegrityReportDto),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn shared_integrity(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let report = DatabaseService::new(&state.db)
        .integrity(SHARED_DATABASE, &shared_tables())
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

/// Compare the database of the `X-Tenant` societe with the entity model
#[utoipa::path(
    get,
    path = "/api/admin/database/integrity/tenant",
    tag = DATABASE_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Integrity report", body = IntegrityReportDto),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn tenant_integrity(
    user: AuthUser,
    tenant: Tenant,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let report = DatabaseService::new(&tenant.db)
        .integrity(&tenant.societe.code, &tenant_tables())
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

/// Apply pending migrations to the shared database and seed default parameters
#[utoipa::path(
    post,
    path = "/api/admin/database/synchronize",
    tag = DATABASE_TAG,
    responses(
        (status = 200, description = "Synchronization outcome", body = OperationResultDto),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn synchronize(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let result = DatabaseService::new(&state.db).synchronize().await;

    Ok((StatusCode::OK, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/admin/database/connection",
    tag = DATABASE_TAG,
    responses(
        (status = 200, description = "Connection status of the shared database", body = ConnectionStatusDto),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn connection_status(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let status = DatabaseService::new(&state.db).connection().await;

    Ok((StatusCode::OK, Json(status)))
}

/// Dump the shared database, or a tenant database when `tenant` is given
#[utoipa::path(
    post,
    path = "/api/admin/database/backup",
    tag = DATABASE_TAG,
    request_body(content = Option<BackupRequestDto>),
    responses(
        (status = 200, description = "Backup outcome", body = BackupResultDto),
        (status = 404, description = "Societe not found", body = ErrorDto),
        (status = 503, description = "pg_dump circuit open", body = ErrorDto)
    ),
)]
pub async fn create_backup(
    State(state): State<AppState>,
    user: AuthUser,
    body: Option<Json<BackupRequestDto>>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let request = body.map(|Json(request)| request).unwrap_or_default();
    let result = backups(&state).backup(request.tenant.as_deref()).await?;

    Ok((StatusCode::OK, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/admin/database/backups",
    tag = DATABASE_TAG,
    responses(
        (status = 200, description = "Backups, newest first", body = Vec<BackupDto>),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn list_backups(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let list = backups(&state).list().await?;

    Ok((StatusCode::OK, Json(list)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/database/backups/{name}",
    tag = DATABASE_TAG,
    params(("name" = String, Path)),
    responses(
        (status = 204, description = "Backup deleted"),
        (status = 400, description = "Invalid backup name", body = ErrorDto),
        (status = 404, description = "Backup not found", body = ErrorDto)
    ),
)]
pub async fn delete_backup(
    State(state): State<AppState>,
    user: AuthUser,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    backups(&state).delete(&name).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Replay a plain SQL backup
#[utoipa::path(
    post,
    path = "/api/admin/database/restore",
    tag = DATABASE_TAG,
    request_body = RestoreRequestDto,
    responses(
        (status = 200, description = "Restore outcome", body = OperationResultDto),
        (status = 400, description = "Invalid name or not a .sql backup", body = ErrorDto),
        (status = 404, description = "Backup not found", body = ErrorDto)
    ),
)]
pub async fn restore_backup(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<RestoreRequestDto>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let result = backups(&state).restore(request).await?;

    Ok((StatusCode::OK, Json(result)))
}
