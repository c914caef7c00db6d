use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        parameter::{CreateParameterDto, ParameterDto, ParameterFilter, UpdateParameterDto},
    },
    server::{
        error::Error,
        model::{app::AppState, auth::AuthUser},
        service::parameter::ParameterService,
    },
};

pub static PARAMETER_TAG: &str = "parameters";

#[utoipa::path(
    get,
    path = "/api/admin/parameters",
    tag = PARAMETER_TAG,
    params(ParameterFilter),
    responses(
        (status = 200, description = "System parameters", body = Vec<ParameterDto>),
        (status = 403, description = "Admin role required", body = ErrorDto)
    ),
)]
pub async fn list_parameters(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<ParameterFilter>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let parameters = ParameterService::new(&state.db)
        .list(filter.category.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(parameters)))
}

#[utoipa::path(
    get,
    path = "/api/admin/parameters/{key}",
    tag = PARAMETER_TAG,
    params(("key" = String, Path)),
    responses(
        (status = 200, description = "The parameter", body = ParameterDto),
        (status = 404, description = "Parameter not found", body = ErrorDto)
    ),
)]
pub async fn get_parameter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let parameter = ParameterService::new(&state.db).get(&key).await?;

    Ok((StatusCode::OK, Json(parameter)))
}

/// Create a parameter; the value must parse as its declared type
#[utoipa::path(
    post,
    path = "/api/admin/parameters",
    tag = PARAMETER_TAG,
    request_body = CreateParameterDto,
    responses(
        (status = 201, description = "Parameter created", body = ParameterDto),
        (status = 400, description = "Value does not match the type", body = ErrorDto),
        (status = 409, description = "Key already used", body = ErrorDto)
    ),
)]
pub async fn create_parameter(
    State(state): State<AppState>,
    user: AuthUser,
    Json(parameter): Json<CreateParameterDto>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let parameter = ParameterService::new(&state.db).create(parameter).await?;

    Ok((StatusCode::CREATED, Json(parameter)))
}

#[utoipa::path(
    put,
    path = "/api/admin/parameters/{key}",
    tag = PARAMETER_TAG,
    params(("key" = String, Path)),
    request_body = UpdateParameterDto,
    responses(
        (status = 200, description = "Parameter updated", body = ParameterDto),
        (status = 400, description = "Value does not match the type", body = ErrorDto),
        (status = 403, description = "Parameter is read-only", body = ErrorDto),
        (status = 404, description = "Parameter not found", body = ErrorDto)
    ),
)]
pub async fn update_parameter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(changes): Json<UpdateParameterDto>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let parameter = ParameterService::new(&state.db)
        .update(&key, changes)
        .await?;

    Ok((StatusCode::OK, Json(parameter)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/parameters/{key}",
    tag = PARAMETER_TAG,
    params(("key" = String, Path)),
    responses(
        (status = 204, description = "Parameter deleted"),
        (status = 403, description = "Parameter is read-only", body = ErrorDto),
        (status = 404, description = "Parameter not found", body = ErrorDto)
    ),
)]
pub async fn delete_parameter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    ParameterService::new(&state.db).delete(&key).await?;

    Ok(StatusCode::NO_CONTENT)
}
