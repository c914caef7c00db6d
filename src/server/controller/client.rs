use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, PageDto},
        client::{
            ClientDto, ClientFilter, ClientStatsDto, CreateClientDto, SuspendClientDto,
            UpdateClientDto,
        },
    },
    server::{error::Error, model::tenant::Tenant, service::client::ClientService},
};

pub static CLIENT_TAG: &str = "clients";

/// List the clients of the tenant
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = CLIENT_TAG,
    params(ClientFilter, ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "A page of clients", body = PageDto<ClientDto>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 403, description = "Tenant not accessible", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_clients(
    tenant: Tenant,
    Query(filter): Query<ClientFilter>,
) -> Result<impl IntoResponse, Error> {
    let clients = ClientService::new(&tenant.db).list(&filter).await?;

    Ok((StatusCode::OK, Json(clients)))
}

#[utoipa::path(
    get,
    path = "/api/clients/stats",
    tag = CLIENT_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Client counts by type and status", body = ClientStatsDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn client_stats(tenant: Tenant) -> Result<impl IntoResponse, Error> {
    let stats = ClientService::new(&tenant.db).stats().await?;

    Ok((StatusCode::OK, Json(stats)))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = CLIENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "The client", body = ClientDto),
        (status = 404, description = "Client not found", body = ErrorDto)
    ),
)]
pub async fn get_client(tenant: Tenant, Path(id): Path<i32>) -> Result<impl IntoResponse, Error> {
    let client = ClientService::new(&tenant.db).get(id).await?;

    Ok((StatusCode::OK, Json(client)))
}

/// Create a client
///
/// The code is generated from the client type when omitted.
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = CLIENT_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    request_body = CreateClientDto,
    responses(
        (status = 201, description = "Client created", body = ClientDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 409, description = "Code already used", body = ErrorDto)
    ),
)]
pub async fn create_client(
    tenant: Tenant,
    Json(client): Json<CreateClientDto>,
) -> Result<impl IntoResponse, Error> {
    let client = ClientService::new(&tenant.db).create(client).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = CLIENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = UpdateClientDto,
    responses(
        (status = 200, description = "Client updated", body = ClientDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 404, description = "Client not found", body = ErrorDto)
    ),
)]
pub async fn update_client(
    tenant: Tenant,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateClientDto>,
) -> Result<impl IntoResponse, Error> {
    let client = ClientService::new(&tenant.db).update(id, changes).await?;

    Ok((StatusCode::OK, Json(client)))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = CLIENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = ErrorDto),
        (status = 409, description = "Client still has projets", body = ErrorDto)
    ),
)]
pub async fn delete_client(tenant: Tenant, Path(id): Path<i32>) -> Result<impl IntoResponse, Error> {
    ClientService::new(&tenant.db).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Turn a prospect into an active client
#[utoipa::path(
    post,
    path = "/api/clients/{id}/convert",
    tag = CLIENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Prospect converted", body = ClientDto),
        (status = 400, description = "Client is not a prospect", body = ErrorDto),
        (status = 404, description = "Client not found", body = ErrorDto)
    ),
)]
pub async fn convert_client(tenant: Tenant, Path(id): Path<i32>) -> Result<impl IntoResponse, Error> {
    let client = ClientService::new(&tenant.db).convert_prospect(id).await?;

    Ok((StatusCode::OK, Json(client)))
}

#[utoipa::path(
    post,
    path = "/api/clients/{id}/suspend",
    tag = CLIENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = SuspendClientDto,
    responses(
        (status = 200, description = "Client suspended", body = ClientDto),
        (status = 404, description = "Client not found", body = ErrorDto)
    ),
)]
pub async fn suspend_client(
    tenant: Tenant,
    Path(id): Path<i32>,
    Json(body): Json<SuspendClientDto>,
) -> Result<impl IntoResponse, Error> {
    let client = ClientService::new(&tenant.db).suspend(id, &body.reason).await?;

    Ok((StatusCode::OK, Json(client)))
}
