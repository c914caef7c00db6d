//! Request and response payloads of the REST API.

pub mod admin;
pub mod api;
pub mod client;
pub mod health;
pub mod marketplace;
pub mod material;
pub mod parameter;
pub mod projet;
pub mod societe;
