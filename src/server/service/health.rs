use chrono::Utc;
use futures::future;

use crate::{
    model::health::{
        CircuitBreakersCheckDto, DatabaseCheckDto, HealthChecksDto, HealthDto, HealthStatus,
        TenantsCheckDto,
    },
    server::{data::schema::SchemaRepository, model::app::AppState},
};

pub struct HealthService<'a> {
    state: &'a AppState,
}

impl<'a> HealthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Overall status: `error` when the shared database is unreachable, `degraded` when a
    /// circuit breaker is open, `ok` otherwise
    pub async fn health(&self) -> HealthDto {
        let (database, connected) =
            future::join(self.check_database(), self.state.tenants.count()).await;
        let open = self.state.breakers.open_names();

        let status = if database.status == HealthStatus::Error {
            HealthStatus::Error
        } else if !open.is_empty() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };

        HealthDto {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: self.state.started_at.elapsed().as_secs(),
            timestamp: Utc::now(),
            checks: HealthChecksDto {
                database,
                tenants: TenantsCheckDto { connected },
                circuit_breakers: CircuitBreakersCheckDto { open },
            },
        }
    }

    /// Whether the shared database answers a ping
    pub async fn ready(&self) -> bool {
        match self.state.db.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Readiness check failed: {}", err);
                false
            }
        }
    }

    async fn check_database(&self) -> DatabaseCheckDto {
        let started = std::time::Instant::now();
        let result = SchemaRepository::new(&self.state.db).server_version().await;
        let response_time_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(version) => DatabaseCheckDto {
                status: HealthStatus::Ok,
                response_time_ms,
                version: Some(version),
                error: None,
            },
            Err(err) => {
                tracing::error!("Health check could not reach the database: {}", err);

                DatabaseCheckDto {
                    status: HealthStatus::Error,
                    response_time_ms,
                    version: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
