use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        marketplace::{
            CreateModuleDto, InstallModuleDto, InstallationResultDto, InstalledModuleDto,
            ModuleDto, ModuleFilter, RateModuleDto, RatingDto, RatingsQuery, UpdateModuleDto,
        },
    },
    server::{
        error::Error,
        model::{app::AppState, auth::AuthUser, tenant::Tenant},
        service::marketplace::MarketplaceService,
    },
};

pub static MARKETPLACE_TAG: &str = "marketplace";

/// Browse the module catalog
///
/// Only published modules are listed unless another `status` is requested.
#[utoipa::path(
    get,
    path = "/api/marketplace/modules",
    tag = MARKETPLACE_TAG,
    params(ModuleFilter),
    responses(
        (status = 200, description = "Modules by downloads then rating", body = Vec<ModuleDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_modules(
    State(state): State<AppState>,
    Query(filter): Query<ModuleFilter>,
) -> Result<impl IntoResponse, Error> {
    let modules = MarketplaceService::new(&state.db).list(&filter).await?;

    Ok((StatusCode::OK, Json(modules)))
}

#[utoipa::path(
    get,
    path = "/api/marketplace/modules/{id}",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path)),
    responses(
        (status = 200, description = "The module", body = ModuleDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn get_module(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let module = MarketplaceService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    get,
    path = "/api/marketplace/modules/key/{key}",
    tag = MARKETPLACE_TAG,
    params(("key" = String, Path)),
    responses(
        (status = 200, description = "The module", body = ModuleDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn get_module_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let module = MarketplaceService::new(&state.db).get_by_key(&key).await?;

    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    get,
    path = "/api/marketplace/modules/{id}/ratings",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path), RatingsQuery),
    responses(
        (status = 200, description = "Visible ratings, newest first", body = Vec<RatingDto>),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<RatingsQuery>,
) -> Result<impl IntoResponse, Error> {
    let ratings = MarketplaceService::new(&state.db)
        .ratings(id, query.limit)
        .await?;

    Ok((StatusCode::OK, Json(ratings)))
}

#[utoipa::path(
    get,
    path = "/api/marketplace/installed",
    tag = MARKETPLACE_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Modules installed for the societe", body = Vec<InstalledModuleDto>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto)
    ),
)]
pub async fn installed_modules(
    State(state): State<AppState>,
    tenant: Tenant,
) -> Result<impl IntoResponse, Error> {
    let installed = MarketplaceService::new(&state.db)
        .installed(tenant.societe.id)
        .await?;

    Ok((StatusCode::OK, Json(installed)))
}

/// Install a module for the societe of the request
///
/// Refusals are returned with `success: false` and a 200 status.
#[utoipa::path(
    post,
    path = "/api/marketplace/modules/{id}/install",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body(content = Option<InstallModuleDto>),
    responses(
        (status = 200, description = "Installation outcome", body = InstallationResultDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn install_module(
    State(state): State<AppState>,
    user: AuthUser,
    tenant: Tenant,
    Path(id): Path<i32>,
    body: Option<Json<InstallModuleDto>>,
) -> Result<impl IntoResponse, Error> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let result = MarketplaceService::new(&state.db)
        .install(tenant.societe.id, id, request, user.id)
        .await?;

    Ok((StatusCode::OK, Json(result)))
}

#[utoipa::path(
    post,
    path = "/api/marketplace/modules/{id}/uninstall",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Uninstallation outcome", body = InstallationResultDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn uninstall_module(
    State(state): State<AppState>,
    user: AuthUser,
    tenant: Tenant,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let result = MarketplaceService::new(&state.db)
        .uninstall(tenant.societe.id, id, user.id)
        .await?;

    Ok((StatusCode::OK, Json(result)))
}

#[utoipa::path(
    post,
    path = "/api/marketplace/modules/{id}/rate",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = RateModuleDto,
    responses(
        (status = 200, description = "Rating recorded", body = RatingDto),
        (status = 400, description = "Rating outside 1 to 5", body = ErrorDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn rate_module(
    State(state): State<AppState>,
    user: AuthUser,
    _tenant: Tenant,
    Path(id): Path<i32>,
    Json(rating): Json<RateModuleDto>,
) -> Result<impl IntoResponse, Error> {
    let rating = MarketplaceService::new(&state.db)
        .rate(id, user.id, rating)
        .await?;

    Ok((StatusCode::OK, Json(rating)))
}

#[utoipa::path(
    post,
    path = "/api/admin/marketplace/modules",
    tag = MARKETPLACE_TAG,
    request_body = CreateModuleDto,
    responses(
        (status = 201, description = "Module created as draft", body = ModuleDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 403, description = "Admin role required", body = ErrorDto),
        (status = 409, description = "Module key already used", body = ErrorDto)
    ),
)]
pub async fn create_module(
    State(state): State<AppState>,
    user: AuthUser,
    Json(module): Json<CreateModuleDto>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let module = MarketplaceService::new(&state.db)
        .create(module, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(module)))
}

#[utoipa::path(
    put,
    path = "/api/admin/marketplace/modules/{id}",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path)),
    request_body = UpdateModuleDto,
    responses(
        (status = 200, description = "Module updated", body = ModuleDto),
        (status = 403, description = "Admin role required", body = ErrorDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn update_module(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateModuleDto>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let module = MarketplaceService::new(&state.db)
        .update(id, changes, user.id)
        .await?;

    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/marketplace/modules/{id}",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path)),
    responses(
        (status = 204, description = "Module deleted"),
        (status = 403, description = "Admin role required or module installed", body = ErrorDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn delete_module(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    MarketplaceService::new(&state.db).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/marketplace/modules/{id}/publish",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path)),
    responses(
        (status = 200, description = "Module published", body = ModuleDto),
        (status = 400, description = "Module is not a draft", body = ErrorDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn publish_module(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let module = MarketplaceService::new(&state.db).publish(id).await?;

    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    post,
    path = "/api/admin/marketplace/modules/{id}/unpublish",
    tag = MARKETPLACE_TAG,
    params(("id" = i32, Path)),
    responses(
        (status = 200, description = "Module disabled", body = ModuleDto),
        (status = 404, description = "Module not found", body = ErrorDto)
    ),
)]
pub async fn unpublish_module(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    user.require_admin()?;

    let module = MarketplaceService::new(&state.db).unpublish(id).await?;

    Ok((StatusCode::OK, Json(module)))
}
