use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, PageDto},
        projet::{
            ChangeStatutDto, CreateProjetDto, ProjetDto, ProjetFilter, ProjetStatsDto,
            UpdateProjetDto,
        },
    },
    server::{error::Error, model::tenant::Tenant, service::projet::ProjetService},
};

pub static PROJET_TAG: &str = "projets";

#[utoipa::path(
    get,
    path = "/api/projets",
    tag = PROJET_TAG,
    params(ProjetFilter, ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "A page of projets", body = PageDto<ProjetDto>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_projets(
    tenant: Tenant,
    Query(filter): Query<ProjetFilter>,
) -> Result<impl IntoResponse, Error> {
    let projets = ProjetService::new(&tenant.db).list(&filter).await?;

    Ok((StatusCode::OK, Json(projets)))
}

#[utoipa::path(
    get,
    path = "/api/projets/stats",
    tag = PROJET_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Projet counts and amounts per statut", body = ProjetStatsDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn projet_stats(tenant: Tenant) -> Result<impl IntoResponse, Error> {
    let stats = ProjetService::new(&tenant.db).stats().await?;

    Ok((StatusCode::OK, Json(stats)))
}

#[utoipa::path(
    get,
    path = "/api/projets/{id}",
    tag = PROJET_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "The projet", body = ProjetDto),
        (status = 404, description = "Projet not found", body = ErrorDto)
    ),
)]
pub async fn get_projet(tenant: Tenant, Path(id): Path<i32>) -> Result<impl IntoResponse, Error> {
    let projet = ProjetService::new(&tenant.db).get(id).await?;

    Ok((StatusCode::OK, Json(projet)))
}

/// Create a projet for an existing client
#[utoipa::path(
    post,
    path = "/api/projets",
    tag = PROJET_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    request_body = CreateProjetDto,
    responses(
        (status = 201, description = "Projet created", body = ProjetDto),
        (status = 400, description = "Validation failed or unknown client", body = ErrorDto)
    ),
)]
pub async fn create_projet(
    tenant: Tenant,
    Json(projet): Json<CreateProjetDto>,
) -> Result<impl IntoResponse, Error> {
    let projet = ProjetService::new(&tenant.db).create(projet).await?;

    Ok((StatusCode::CREATED, Json(projet)))
}

#[utoipa::path(
    put,
    path = "/api/projets/{id}",
    tag = PROJET_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = UpdateProjetDto,
    responses(
        (status = 200, description = "Projet updated", body = ProjetDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 404, description = "Projet not found", body = ErrorDto)
    ),
)]
pub async fn update_projet(
    tenant: Tenant,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateProjetDto>,
) -> Result<impl IntoResponse, Error> {
    let projet = ProjetService::new(&tenant.db).update(id, changes).await?;

    Ok((StatusCode::OK, Json(projet)))
}

/// Move a projet along its lifecycle
#[utoipa::path(
    put,
    path = "/api/projets/{id}/statut",
    tag = PROJET_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = ChangeStatutDto,
    responses(
        (status = 200, description = "Statut changed", body = ProjetDto),
        (status = 400, description = "Transition not allowed", body = ErrorDto),
        (status = 404, description = "Projet not found", body = ErrorDto)
    ),
)]
pub async fn change_projet_statut(
    tenant: Tenant,
    Path(id): Path<i32>,
    Json(body): Json<ChangeStatutDto>,
) -> Result<impl IntoResponse, Error> {
    let projet = ProjetService::new(&tenant.db)
        .change_statut(id, body.statut)
        .await?;

    Ok((StatusCode::OK, Json(projet)))
}

#[utoipa::path(
    delete,
    path = "/api/projets/{id}",
    tag = PROJET_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 204, description = "Projet deleted"),
        (status = 404, description = "Projet not found", body = ErrorDto)
    ),
)]
pub async fn delete_projet(tenant: Tenant, Path(id): Path<i32>) -> Result<impl IntoResponse, Error> {
    ProjetService::new(&tenant.db).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
