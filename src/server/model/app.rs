use std::{net::IpAddr, sync::Arc, time::Instant};

use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    metrics::Metrics,
    model::auth::JwtKeys,
    resilience::{circuit_breaker::CircuitBreakers, rate_limit::RateLimiter},
    service::{backup::BackupConfig, tenant::TenantConnections},
};

#[derive(Clone)]
pub struct AppState {
    /// Shared database: societes, parameters and the marketplace
    pub db: DatabaseConnection,
    pub tenants: TenantConnections,
    pub breakers: CircuitBreakers,
    pub rate_limiter: RateLimiter,
    pub metrics: Arc<Metrics>,
    pub jwt: JwtKeys,
    pub backup: Arc<BackupConfig>,
    /// Reverse proxies whose `X-Forwarded-For` entries are believed
    pub trusted_proxies: Arc<[IpAddr]>,
    pub started_at: Instant,
}

impl AppState {
    /// Builds the state with fresh circuit breakers and metrics recorder, trusting no proxy
    pub fn new(
        db: DatabaseConnection,
        tenant_database_url_template: &str,
        rate_limiter: RateLimiter,
        jwt: JwtKeys,
        backup: BackupConfig,
    ) -> Result<Self, Error> {
        let breakers = CircuitBreakers::new();
        let tenants =
            TenantConnections::new(tenant_database_url_template, breakers.tenant_database());

        Ok(Self {
            db,
            tenants,
            breakers,
            rate_limiter,
            metrics: Arc::new(Metrics::new()?),
            jwt,
            backup: Arc::new(backup),
            trusted_proxies: Arc::from([]),
            started_at: Instant::now(),
        })
    }

    pub fn with_trusted_proxies(mut self, proxies: impl Into<Arc<[IpAddr]>>) -> Self {
        self.trusted_proxies = proxies.into();
        self
    }
}
