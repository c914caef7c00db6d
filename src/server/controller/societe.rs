use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        societe::{CreateSocieteDto, SocieteDto, UpdateSocieteStatusDto},
    },
    server::{
        error::Error,
        model::{app::AppState, auth::AuthUser},
        service::societe::SocieteService,
    },
};

pub static SOCIETE_TAG: &str = "societes";

#[utoipa::path(
    get,
    path = "/api/admin/societes",
    tag = SOCIETE_TAG,
    responses(
        (status = 200, description = "All societes", body = Vec<SocieteDto>),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn list_societes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let societes = SocieteService::new(&state.db, &state.tenants).list().await?;

    Ok((StatusCode::OK, Json(societes)))
}

#[utoipa::path(
    get,
    path = "/api/admin/societes/{id}",
    tag = SOCIETE_TAG,
    params(("id" = i32, Path)),
    responses(
        (status = 200, description = "The societe", body = SocieteDto),
        (status = 404, description = "Societe not found", body = ErrorDto)
    ),
)]
pub async fn get_societe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let societe = SocieteService::new(&state.db, &state.tenants).get(id).await?;

    Ok((StatusCode::OK, Json(societe)))
}

/// Register a societe and provision its tenant database
#[utoipa::path(
    post,
    path = "/api/admin/societes",
    tag = SOCIETE_TAG,
    request_body = CreateSocieteDto,
    responses(
        (status = 201, description = "Societe created", body = SocieteDto),
        (status = 400, description = "Invalid code", body = ErrorDto),
        (status = 409, description = "Code already used", body = ErrorDto),
        (status = 503, description = "Tenant database unavailable", body = ErrorDto)
    ),
)]
pub async fn create_societe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(societe): Json<CreateSocieteDto>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let societe = SocieteService::new(&state.db, &state.tenants)
        .create(societe)
        .await?;

    Ok((StatusCode::CREATED, Json(societe)))
}

#[utoipa::path(
    put,
    path = "/api/admin/societes/{id}/status",
    tag = SOCIETE_TAG,
    params(("id" = i32, Path)),
    request_body = UpdateSocieteStatusDto,
    responses(
        (status = 200, description = "Status changed", body = SocieteDto),
        (status = 400, description = "Societe not provisioned yet", body = ErrorDto),
        (status = 404, description = "Societe not found", body = ErrorDto)
    ),
)]
pub async fn update_societe_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateSocieteStatusDto>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let societe = SocieteService::new(&state.db, &state.tenants)
        .update_status(id, body.status)
        .await?;

    Ok((StatusCode::OK, Json(societe)))
}

/// Retry provisioning of a societe whose creation failed
#[utoipa::path(
    post,
    path = "/api/admin/societes/{id}/provision",
    tag = SOCIETE_TAG,
    params(("id" = i32, Path)),
    responses(
        (status = 200, description = "Societe provisioned", body = SocieteDto),
        (status = 400, description = "Societe already provisioned", body = ErrorDto),
        (status = 404, description = "Societe not found", body = ErrorDto),
        (status = 503, description = "Tenant database unavailable", body = ErrorDto)
    ),
)]
pub async fn provision_societe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let societe = SocieteService::new(&state.db, &state.tenants)
        .provision(id)
        .await?;

    Ok((StatusCode::OK, Json(societe)))
}
