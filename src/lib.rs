//! TopSteel ERP backend.
//!
//! `model` holds the JSON transfer objects of the REST API, `server` the axum application,
//! its services and repositories.

pub mod model;
pub mod server;
