use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Ok,
    Missing,
    Extra,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableCheckDto {
    pub table: String,
    pub status: TableStatus,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct IntegritySummaryDto {
    pub total: usize,
    pub ok: usize,
    pub missing: usize,
    pub extra: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IntegrityReportDto {
    /// `shared` or the tenant code
    pub database: String,
    pub tables: Vec<TableCheckDto>,
    pub summary: IntegritySummaryDto,
    pub can_synchronize: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectionStatusDto {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BackupDto {
    pub file_name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BackupResultDto {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupDto>,
}

/// Target of a backup or restore: omit `tenant` for the shared database
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BackupRequestDto {
    pub tenant: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestoreRequestDto {
    pub file_name: String,
    pub tenant: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitStateDto {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CircuitBreakerDto {
    pub name: String,
    pub state: CircuitStateDto,
    pub successes: u64,
    pub failures: u64,
    pub timeouts: u64,
    pub rejections: u64,
    pub last_failure_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateLimitStatsDto {
    pub backend: String,
    pub window_secs: u64,
    pub max_requests: u32,
    pub checks: u64,
    pub blocked: u64,
    /// Only reported by the in-memory backend
    pub tracked_keys: Option<usize>,
}
