//! Service layer for business logic and orchestration.
//!
//! Services validate requests against business rules, coordinate repositories inside
//! transactions and translate outcomes into DTOs. Tenant-scoped services receive the tenant
//! database connection resolved for the request; the others work on the shared database.

pub mod backup;
pub mod client;
pub mod database;
pub mod health;
pub mod marketplace;
pub mod material;
pub mod movement;
pub mod parameter;
pub mod projet;
pub mod retry;
pub mod societe;
pub mod tenant;
