use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatabaseCheckDto {
    pub status: HealthStatus,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantsCheckDto {
    pub connected: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CircuitBreakersCheckDto {
    pub open: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthChecksDto {
    pub database: DatabaseCheckDto,
    pub tenants: TenantsCheckDto,
    pub circuit_breakers: CircuitBreakersCheckDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_secs: u64,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecksDto,
}

/// Body of the liveness and readiness checks
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LivenessDto {
    pub status: String,
}

impl LivenessDto {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}
