use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, PageDto},
        material::{
            CreateMaterialDto, CreateMovementDto, InventoryDto, MaterialCreatedDto, MaterialDto,
            MaterialFilter, MovementDto, ReorderItemDto, UpdateMaterialDto, ValuationDto,
        },
    },
    server::{
        error::Error,
        model::{auth::AuthUser, tenant::Tenant},
        service::{material::MaterialService, movement::MovementService},
    },
};

pub static MATERIAL_TAG: &str = "materials";
pub static MOVEMENT_TAG: &str = "movements";

#[utoipa::path(
    get,
    path = "/api/materials",
    tag = MATERIAL_TAG,
    params(MaterialFilter, ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "A page of materials", body = PageDto<MaterialDto>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_materials(
    tenant: Tenant,
    Query(filter): Query<MaterialFilter>,
) -> Result<impl IntoResponse, Error> {
    let materials = MaterialService::new(&tenant.db).list(&filter).await?;

    Ok((StatusCode::OK, Json(materials)))
}

/// Materials under their minimum stock with the quantity to order
#[utoipa::path(
    get,
    path = "/api/materials/reorder",
    tag = MATERIAL_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Materials to reorder", body = Vec<ReorderItemDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reorder_materials(tenant: Tenant) -> Result<impl IntoResponse, Error> {
    let items = MaterialService::new(&tenant.db).reorder().await?;

    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    get,
    path = "/api/materials/valuation",
    tag = MATERIAL_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Stock valuation", body = ValuationDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn material_valuation(tenant: Tenant) -> Result<impl IntoResponse, Error> {
    let valuation = MaterialService::new(&tenant.db).valuation().await?;

    Ok((StatusCode::OK, Json(valuation)))
}

#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    tag = MATERIAL_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "The material", body = MaterialDto),
        (status = 404, description = "Material not found", body = ErrorDto)
    ),
)]
pub async fn get_material(tenant: Tenant, Path(id): Path<i32>) -> Result<impl IntoResponse, Error> {
    let material = MaterialService::new(&tenant.db).get(id).await?;

    Ok((StatusCode::OK, Json(material)))
}

/// Create a material
///
/// Inconsistent dimensions or weight are reported as warnings without rejecting the
/// material.
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = MATERIAL_TAG,
    params(("X-Tenant" = String, Header, description = "Societe code")),
    request_body = CreateMaterialDto,
    responses(
        (status = 201, description = "Material created", body = MaterialCreatedDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 409, description = "Reference already used", body = ErrorDto)
    ),
)]
pub async fn create_material(
    tenant: Tenant,
    Json(material): Json<CreateMaterialDto>,
) -> Result<impl IntoResponse, Error> {
    let created = MaterialService::new(&tenant.db).create(material).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    tag = MATERIAL_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = UpdateMaterialDto,
    responses(
        (status = 200, description = "Material updated", body = MaterialDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 404, description = "Material not found", body = ErrorDto)
    ),
)]
pub async fn update_material(
    tenant: Tenant,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateMaterialDto>,
) -> Result<impl IntoResponse, Error> {
    let material = MaterialService::new(&tenant.db).update(id, changes).await?;

    Ok((StatusCode::OK, Json(material)))
}

#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    tag = MATERIAL_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 204, description = "Material deleted"),
        (status = 404, description = "Material not found", body = ErrorDto),
        (status = 409, description = "Material has stock or movements", body = ErrorDto)
    ),
)]
pub async fn delete_material(
    tenant: Tenant,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    MaterialService::new(&tenant.db).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Record a physical count of the material
#[utoipa::path(
    post,
    path = "/api/materials/{id}/inventory",
    tag = MATERIAL_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = InventoryDto,
    responses(
        (status = 200, description = "Stock counted", body = MaterialDto),
        (status = 400, description = "Negative stock", body = ErrorDto),
        (status = 404, description = "Material not found", body = ErrorDto)
    ),
)]
pub async fn inventory_material(
    user: AuthUser,
    tenant: Tenant,
    Path(id): Path<i32>,
    Json(inventory): Json<InventoryDto>,
) -> Result<impl IntoResponse, Error> {
    let material = MaterialService::new(&tenant.db)
        .inventory(id, inventory, user.id)
        .await?;

    Ok((StatusCode::OK, Json(material)))
}

/// Movements of the material, newest first
#[utoipa::path(
    get,
    path = "/api/materials/{id}/movements",
    tag = MOVEMENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Movements of the material", body = Vec<MovementDto>),
        (status = 404, description = "Material not found", body = ErrorDto)
    ),
)]
pub async fn list_movements(
    tenant: Tenant,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let movements = MovementService::new(&tenant.db).list_by_material(id).await?;

    Ok((StatusCode::OK, Json(movements)))
}

/// Create a stock movement, applying it right away when `auto_validate` is set
#[utoipa::path(
    post,
    path = "/api/materials/{id}/movements",
    tag = MOVEMENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    request_body = CreateMovementDto,
    responses(
        (status = 201, description = "Movement created", body = MovementDto),
        (status = 400, description = "Invalid quantity or insufficient stock", body = ErrorDto),
        (status = 404, description = "Material not found", body = ErrorDto)
    ),
)]
pub async fn create_movement(
    user: AuthUser,
    tenant: Tenant,
    Path(id): Path<i32>,
    Json(movement): Json<CreateMovementDto>,
) -> Result<impl IntoResponse, Error> {
    let movement = MovementService::new(&tenant.db)
        .create(id, movement, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

#[utoipa::path(
    post,
    path = "/api/movements/{id}/validate",
    tag = MOVEMENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Movement applied to the stock", body = MovementDto),
        (status = 400, description = "Movement is not a draft or stock is insufficient", body = ErrorDto),
        (status = 404, description = "Movement not found", body = ErrorDto)
    ),
)]
pub async fn validate_movement(
    user: AuthUser,
    tenant: Tenant,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let movement = MovementService::new(&tenant.db).validate(id, user.id).await?;

    Ok((StatusCode::OK, Json(movement)))
}

#[utoipa::path(
    post,
    path = "/api/movements/{id}/cancel",
    tag = MOVEMENT_TAG,
    params(("id" = i32, Path), ("X-Tenant" = String, Header, description = "Societe code")),
    responses(
        (status = 200, description = "Movement cancelled", body = MovementDto),
        (status = 400, description = "Movement is not a draft", body = ErrorDto),
        (status = 404, description = "Movement not found", body = ErrorDto)
    ),
)]
pub async fn cancel_movement(tenant: Tenant, Path(id): Path<i32>) -> Result<impl IntoResponse, Error> {
    let movement = MovementService::new(&tenant.db).cancel(id).await?;

    Ok((StatusCode::OK, Json(movement)))
}
