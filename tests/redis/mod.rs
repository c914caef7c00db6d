//! Valkey-backed rate limiter, run with `--features redis-test` against a local server.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fred::prelude::*;
use topsteel::server::{
    error::Error,
    resilience::rate_limit::{RateLimitConfig, RateLimiter},
};

async fn redis_limiter(max_requests: u32) -> Result<RateLimiter, Error> {
    let config = Config::from_url("redis://127.0.0.1:6379")?;
    let pool = Pool::new(config, None, None, None, 2)?;
    pool.init().await?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    Ok(RateLimiter::new_redis(
        pool,
        RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests,
        },
        format!("topsteel-test-{:x}", nanos),
    ))
}

/// Expect the shared window to block once the budget is spent and reset to clear it
#[tokio::test]
async fn blocks_and_resets() -> Result<(), Error> {
    let limiter = redis_limiter(2).await?;

    let first = limiter.check("ip:203.0.113.9", None).await?;
    let second = limiter.check("ip:203.0.113.9", None).await?;
    let third = limiter.check("ip:203.0.113.9", None).await?;

    assert!(first.allowed);
    assert_eq!(first.remaining, 1);
    assert!(second.allowed);
    assert!(!third.allowed);
    assert!(third.retry_after_secs.is_some());
    assert_eq!(third.violations, 1);

    limiter.reset("ip:203.0.113.9").await?;
    let after_reset = limiter.check("ip:203.0.113.9", None).await?;

    assert!(after_reset.allowed);
    assert_eq!(after_reset.violations, 0);
    assert_eq!(limiter.backend_name(), "redis");

    Ok(())
}

/// Expect identifiers to keep separate windows
#[tokio::test]
async fn separates_identifiers() -> Result<(), Error> {
    let limiter = redis_limiter(1).await?;

    assert!(limiter.check("user:1", None).await?.allowed);
    assert!(!limiter.check("user:1", None).await?.allowed);
    assert!(limiter.check("user:2", None).await?.allowed);

    limiter.reset("user:1").await?;
    limiter.reset("user:2").await?;

    Ok(())
}
