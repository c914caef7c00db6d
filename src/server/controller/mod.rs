//! HTTP controller endpoints of the TopSteel API.
//!
//! Handlers extract the caller (`AuthUser`) and, for tenant routes, the societe database
//! (`Tenant`), delegate to a service and map the outcome to a status code and JSON body.
//! Each handler carries its utoipa path annotation for the OpenAPI document.

pub mod client;
pub mod database;
pub mod health;
pub mod marketplace;
pub mod material;
pub mod parameter;
pub mod projet;
pub mod resilience;
pub mod societe;
