//! Server application models and type definitions.
//!
//! This module contains the application state shared by every handler and the request
//! extractors resolving the authenticated caller and the tenant of a request.

pub mod app;
pub mod auth;
pub mod tenant;
