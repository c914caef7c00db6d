use std::time::Duration;

use chrono::Utc;
use fred::prelude::*;

use super::{
    lua::{COUNT_VIOLATIONS_SCRIPT, RECORD_VIOLATION_SCRIPT, SLIDING_WINDOW_SCRIPT},
    WindowHit,
};
use crate::server::error::Error;

/// Sliding-window log kept in Valkey/Redis sorted sets, shared by all server instances.
pub struct RedisBackend {
    pool: Pool,
}

impl RedisBackend {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn hit(&self, key: &str, window: Duration, limit: u32) -> Result<WindowHit, Error> {
        let now = Utc::now().timestamp_millis();
        let window_ms = window.as_millis() as i64;

        let result: Vec<i64> = self
            .pool
            .eval(
                SLIDING_WINDOW_SCRIPT,
                vec![key],
                vec![
                    now.to_string(),
                    window_ms.to_string(),
                    limit.to_string(),
                    unique_member(now),
                ],
            )
            .await?;

        let allowed = result.first().copied().unwrap_or(1) == 1;
        let count = result.get(1).copied().unwrap_or(0).max(0) as u32;
        let oldest = result.get(2).copied().unwrap_or(now);
        let reset_after_ms = (oldest + window_ms - now).max(0) as u64;

        Ok(WindowHit {
            allowed,
            count,
            reset_after: Duration::from_millis(reset_after_ms),
        })
    }

    pub async fn count(&self, key: &str, period: Duration) -> Result<u32, Error> {
        let now = Utc::now().timestamp_millis();

        let count: i64 = self
            .pool
            .eval(
                COUNT_VIOLATIONS_SCRIPT,
                vec![key],
                vec![now.to_string(), period.as_millis().to_string()],
            )
            .await?;

        Ok(count.max(0) as u32)
    }

    pub async fn record(&self, key: &str, period: Duration) -> Result<u32, Error> {
        let now = Utc::now().timestamp_millis();

        let count: i64 = self
            .pool
            .eval(
                RECORD_VIOLATION_SCRIPT,
                vec![key],
                vec![
                    now.to_string(),
                    period.as_millis().to_string(),
                    unique_member(now),
                ],
            )
            .await?;

        Ok(count.max(0) as u32)
    }

    pub async fn remove(&self, keys: &[String]) -> Result<(), Error> {
        let _: i64 = self.pool.del(keys.to_vec()).await?;

        Ok(())
    }
}

/// Requests arriving within the same millisecond must not collapse into one ZSET member.
fn unique_member(now: i64) -> String {
    format!("{}-{:016x}", now, rand::random::<u64>())
}
