//! Test fixtures inserting records into the shared and tenant databases.
//!
//! - `auth` - signed bearer tokens
//! - `factory` - in-memory models for pure unit tests
//! - `marketplace` - modules, installations and ratings
//! - `parameter` - system parameters
//! - `societe` - tenants
//! - `tenant` - clients, projets, materials and movements

pub mod auth;
pub mod factory;
pub mod marketplace;
pub mod parameter;
pub mod societe;
pub mod tenant;
