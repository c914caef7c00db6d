//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every endpoint is registered through utoipa-axum so the OpenAPI document served at
//! `/api/docs/openapi.json` always matches the mounted routes. The `/api` routes sit behind
//! the rate limiter; the health checks and `/metrics` do not. All matched routes are measured.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        client, database, health, marketplace, material, parameter, projet, resilience, societe,
    },
    middleware::{rate_limit, track_metrics},
    model::app::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "TopSteel", description = "TopSteel ERP API"),
    tags(
        (name = client::CLIENT_TAG, description = "Clients and prospects of the societe"),
        (name = projet::PROJET_TAG, description = "Projets of the societe"),
        (name = material::MATERIAL_TAG, description = "Materials and stock"),
        (name = material::MOVEMENT_TAG, description = "Stock movements"),
        (name = marketplace::MARKETPLACE_TAG, description = "Module catalog and installations"),
        (name = parameter::PARAMETER_TAG, description = "System parameters"),
        (name = societe::SOCIETE_TAG, description = "Societes and their databases"),
        (name = database::DATABASE_TAG, description = "Database integrity and backups"),
        (name = resilience::RESILIENCE_TAG, description = "Circuit breakers and rate limiting"),
        (name = health::HEALTH_TAG, description = "Health checks and metrics"),
    )
)]
struct ApiDoc;

fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(client::list_clients, client::create_client))
        .routes(routes!(client::client_stats))
        .routes(routes!(
            client::get_client,
            client::update_client,
            client::delete_client
        ))
        .routes(routes!(client::convert_client))
        .routes(routes!(client::suspend_client))
        .routes(routes!(projet::list_projets, projet::create_projet))
        .routes(routes!(projet::projet_stats))
        .routes(routes!(
            projet::get_projet,
            projet::update_projet,
            projet::delete_projet
        ))
        .routes(routes!(projet::change_projet_statut))
        .routes(routes!(material::list_materials, material::create_material))
        .routes(routes!(material::reorder_materials))
        .routes(routes!(material::material_valuation))
        .routes(routes!(
            material::get_material,
            material::update_material,
            material::delete_material
        ))
        .routes(routes!(material::inventory_material))
        .routes(routes!(material::list_movements, material::create_movement))
        .routes(routes!(material::validate_movement))
        .routes(routes!(material::cancel_movement))
        .routes(routes!(marketplace::list_modules))
        .routes(routes!(marketplace::get_module))
        .routes(routes!(marketplace::get_module_by_key))
        .routes(routes!(marketplace::list_ratings))
        .routes(routes!(marketplace::installed_modules))
        .routes(routes!(marketplace::install_module))
        .routes(routes!(marketplace::uninstall_module))
        .routes(routes!(marketplace::rate_module))
        .routes(routes!(marketplace::create_module))
        .routes(routes!(
            marketplace::update_module,
            marketplace::delete_module
        ))
        .routes(routes!(marketplace::publish_module))
        .routes(routes!(marketplace::unpublish_module))
        .routes(routes!(
            parameter::list_parameters,
            parameter::create_parameter
        ))
        .routes(routes!(
            parameter::get_parameter,
            parameter::update_parameter,
            parameter::delete_parameter
        ))
        .routes(routes!(societe::list_societes, societe::create_societe))
        .routes(routes!(societe::get_societe))
        .routes(routes!(societe::update_societe_status))
        .routes(routes!(societe::provision_societe))
        .routes(routes!(database::shared_integrity))
        .routes(routes!(database::tenant_integrity))
        .routes(routes!(database::synchronize))
        .routes(routes!(database::connection_status))
        .routes(routes!(database::create_backup))
        .routes(routes!(database::list_backups))
        .routes(routes!(database::delete_backup))
        .routes(routes!(database::restore_backup))
        .routes(routes!(resilience::list_circuit_breakers))
        .routes(routes!(resilience::reset_circuit_breaker))
        .routes(routes!(resilience::rate_limit_stats))
        .routes(routes!(resilience::reset_rate_limit))
}

fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health::health))
        .routes(routes!(health::live))
        .routes(routes!(health::ready))
        .routes(routes!(health::metrics))
}

/// Builds the application router with Swagger UI at `/api/docs`.
pub fn router(state: AppState) -> Router {
    let api = api_routes().layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    let (routes, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(api)
        .merge(health_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .split_for_parts();

    routes
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi))
        .with_state(state)
}
