use sea_orm::DbErr;

use super::{resilience::ResilienceError, Error};

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient failures)
    Retry,
    /// Failed permanently (bad request, business rule, bug)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::DbErr(db_err) => match db_err {
                // Connection acquisition errors - transient, should retry
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                // Connection errors - transient, should retry
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,

                // Query, type conversion, schema and record errors won't resolve with retry
                _ => ErrorRetryStrategy::Fail,
            },

            // A slow call may succeed on the next attempt, an open circuit won't until reset
            Self::ResilienceError(ResilienceError::Timeout { .. }) => ErrorRetryStrategy::Retry,
            Self::ResilienceError(_) => ErrorRetryStrategy::Fail,

            // Valkey connection issues are transient
            Self::RedisError(_) => ErrorRetryStrategy::Retry,
            Self::IoError(_) => ErrorRetryStrategy::Retry,

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::AuthError(_) => ErrorRetryStrategy::Fail,
            Self::TenantError(_) => ErrorRetryStrategy::Fail,
            Self::BusinessError(_) => ErrorRetryStrategy::Fail,
            Self::MaintenanceError(_) => ErrorRetryStrategy::Fail,
            Self::InternalError(_) => ErrorRetryStrategy::Fail,
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
            Self::MetricsError(_) => ErrorRetryStrategy::Fail,
            Self::JsonError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
