use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::DatabaseConnection;

use crate::server::{
    error::{tenant::TenantError, Error},
    model::{app::AppState, auth::AuthUser},
    service::tenant::{TenantService, TENANT_HEADER},
};

/// Societe selected by the `X-Tenant` header together with its database
///
/// Extraction authenticates the caller first, so handlers taking a `Tenant` need no
/// separate `AuthUser` unless they use the caller's identity.
pub struct Tenant {
    pub societe: entity::societe::Model,
    pub db: DatabaseConnection,
}

impl FromRequestParts<AppState> for Tenant {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let header = parts
            .headers
            .get(TENANT_HEADER)
            .ok_or(TenantError::MissingHeader)?;
        let code = header
            .to_str()
            .map_err(|_| TenantError::InvalidCode(String::from_utf8_lossy(header.as_bytes()).into_owned()))?
            .trim();

        TenantService::new(&state.db, &state.tenants)
            .resolve(&user, code)
            .await
    }
}
