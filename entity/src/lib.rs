//! `SeaORM` entities for the shared database and the per-tenant databases.
//!
//! Shared: `societe`, `system_parameter`, `marketplace_module`, `module_installation`,
//! `module_rating`. Tenant: `client`, `projet`, `material`, `material_movement`.

pub mod prelude;

pub mod client;
pub mod marketplace_module;
pub mod material;
pub mod material_movement;
pub mod module_installation;
pub mod module_rating;
pub mod projet;
pub mod sea_orm_active_enums;
pub mod societe;
pub mod system_parameter;
