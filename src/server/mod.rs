//! Server application core modules.
//!
//! This module contains the HTTP layer, services, repositories and the resilience machinery
//! (circuit breakers, rate limiting, metrics) of the TopSteel ERP backend. The shared database
//! stores societes, system parameters and the module marketplace; every societe owns a
//! separate tenant database holding its clients, projets, materials and stock movements.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod resilience;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
