//! Data access layer repositories.
//!
//! Repositories are generic over `ConnectionTrait` so the same code runs against a
//! connection pool or inside a transaction. Shared database repositories: `societe`,
//! `system_parameter`, `marketplace`. Tenant database repositories: `client`, `projet`,
//! `material`, `material_movement`. `schema` introspects either database.

pub mod client;
pub mod marketplace;
pub mod material;
pub mod material_movement;
pub mod projet;
pub mod schema;
pub mod societe;
pub mod system_parameter;
