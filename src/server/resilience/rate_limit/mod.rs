//! Sliding-window rate limiting with role-based budgets and progressive penalties.
//!
//! Two interchangeable backends are provided: an in-process log used by default and in
//! tests, and a Valkey/Redis sorted-set log shared by every server instance. The Redis
//! backend fails open: when the store is unreachable the request is allowed and a warning
//! is logged.

pub mod lua;
pub mod memory;
pub mod redis;

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use fred::prelude::Pool;

use crate::{
    model::admin::RateLimitStatsDto,
    server::{
        error::Error,
        model::auth::GlobalRole,
        resilience::rate_limit::{memory::MemoryBackend, redis::RedisBackend},
    },
};

/// Violations are counted over this period when computing the penalty multiplier.
pub const VIOLATION_PERIOD: Duration = Duration::from_secs(3600);

/// Violation count from which blocked identifiers are reported as suspicious.
pub const SUSPICIOUS_VIOLATIONS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

/// Result of a single window evaluation in a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    pub allowed: bool,
    /// Requests currently counted in the window, including this one when allowed.
    pub count: u32,
    /// Time until the oldest counted request leaves the window.
    pub reset_after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
    /// Seconds the caller must wait, set only when blocked.
    pub retry_after_secs: Option<u64>,
    pub violations: u32,
}

enum Backend {
    Memory(MemoryBackend),
    Redis(RedisBackend),
}

struct Inner {
    backend: Backend,
    config: RateLimitConfig,
    namespace: String,
    checks: AtomicU64,
    blocked: AtomicU64,
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

impl RateLimiter {
    pub fn new_memory(config: RateLimitConfig, namespace: impl Into<String>) -> Self {
        Self::with_backend(Backend::Memory(MemoryBackend::new()), config, namespace)
    }

    pub fn new_redis(pool: Pool, config: RateLimitConfig, namespace: impl Into<String>) -> Self {
        Self::with_backend(Backend::Redis(RedisBackend::new(pool)), config, namespace)
    }

    fn with_backend(backend: Backend, config: RateLimitConfig, namespace: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                namespace: namespace.into(),
                checks: AtomicU64::new(0),
                blocked: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.inner.config
    }

    fn window_key(&self, identifier: &str) -> String {
        format!("{}:rate_limit:{}", self.inner.namespace, identifier)
    }

    fn violations_key(&self, identifier: &str) -> String {
        format!("{}:rate_limit:violations:{}", self.inner.namespace, identifier)
    }

    /// Evaluates and records one request for `identifier`.
    ///
    /// `role` is the caller's global role when authenticated; anonymous callers get the base budget.
    pub async fn check(
        &self,
        identifier: &str,
        role: Option<GlobalRole>,
    ) -> Result<RateLimitDecision, Error> {
        self.inner.checks.fetch_add(1, Ordering::Relaxed);

        match self.try_check(identifier, role).await {
            Ok(decision) => {
                if !decision.allowed {
                    self.inner.blocked.fetch_add(1, Ordering::Relaxed);
                }

                Ok(decision)
            }
            Err(e) => {
                // Rate limiting must never take the API down with the store
                tracing::warn!(identifier, "Rate limit store unavailable, allowing request: {}", e);

                let limit = self.inner.config.max_requests;
                Ok(RateLimitDecision {
                    allowed: true,
                    limit,
                    remaining: limit,
                    reset_after: self.inner.config.window,
                    retry_after_secs: None,
                    violations: 0,
                })
            }
        }
    }

    async fn try_check(
        &self,
        identifier: &str,
        role: Option<GlobalRole>,
    ) -> Result<RateLimitDecision, Error> {
        let config = self.inner.config;
        let window_key = self.window_key(identifier);
        let violations_key = self.violations_key(identifier);

        let prior_violations = match &self.inner.backend {
            Backend::Memory(backend) => backend.count(&violations_key, VIOLATION_PERIOD),
            Backend::Redis(backend) => backend.count(&violations_key, VIOLATION_PERIOD).await?,
        };

        let limit = effective_limit(config.max_requests, role, prior_violations);

        let hit = match &self.inner.backend {
            Backend::Memory(backend) => backend.hit(&window_key, config.window, limit),
            Backend::Redis(backend) => backend.hit(&window_key, config.window, limit).await?,
        };

        if hit.allowed {
            return Ok(RateLimitDecision {
                allowed: true,
                limit,
                remaining: limit.saturating_sub(hit.count),
                reset_after: hit.reset_after,
                retry_after_secs: None,
                violations: prior_violations,
            });
        }

        let violations = match &self.inner.backend {
            Backend::Memory(backend) => backend.record(&violations_key, VIOLATION_PERIOD),
            Backend::Redis(backend) => backend.record(&violations_key, VIOLATION_PERIOD).await?,
        };

        if violations >= SUSPICIOUS_VIOLATIONS {
            tracing::warn!(
                identifier,
                violations,
                "Suspicious activity: repeated rate limit violations"
            );
        }

        let retry_after_secs = hit.reset_after.as_millis().div_ceil(1000).max(1) as u64;

        Ok(RateLimitDecision {
            allowed: false,
            limit,
            remaining: 0,
            reset_after: hit.reset_after,
            retry_after_secs: Some(retry_after_secs),
            violations,
        })
    }

    /// Clears the window and violation history of `identifier`.
    pub async fn reset(&self, identifier: &str) -> Result<(), Error> {
        let keys = vec![self.window_key(identifier), self.violations_key(identifier)];

        match &self.inner.backend {
            Backend::Memory(backend) => backend.remove(&keys),
            Backend::Redis(backend) => backend.remove(&keys).await?,
        }

        tracing::info!(identifier, "Rate limit reset");

        Ok(())
    }

    /// Drops expired in-memory entries. Redis keys expire on their own.
    pub fn purge(&self) -> usize {
        match &self.inner.backend {
            Backend::Memory(backend) => {
                backend.purge(self.inner.config.window.max(VIOLATION_PERIOD))
            }
            Backend::Redis(_) => 0,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.inner.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }

    pub fn blocked_total(&self) -> u64 {
        self.inner.blocked.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> RateLimitStatsDto {
        let tracked_keys = match &self.inner.backend {
            Backend::Memory(backend) => Some(backend.tracked_keys()),
            Backend::Redis(_) => None,
        };

        RateLimitStatsDto {
            backend: self.backend_name().to_string(),
            window_secs: self.inner.config.window.as_secs(),
            max_requests: self.inner.config.max_requests,
            checks: self.inner.checks.load(Ordering::Relaxed),
            blocked: self.blocked_total(),
            tracked_keys,
        }
    }
}

pub fn role_multiplier(role: Option<GlobalRole>) -> f64 {
    match role {
        Some(GlobalRole::SuperAdmin) => 10.0,
        Some(GlobalRole::Admin) => 5.0,
        Some(GlobalRole::Manager) => 3.0,
        Some(GlobalRole::Commercial | GlobalRole::Comptable | GlobalRole::Technicien) => 2.0,
        Some(GlobalRole::Operateur) => 1.5,
        Some(GlobalRole::User) | None => 1.0,
        Some(GlobalRole::Viewer) => 0.5,
    }
}

pub fn penalty_multiplier(violations: u32) -> u32 {
    match violations {
        20.. => 16,
        10.. => 8,
        5.. => 4,
        3.. => 2,
        _ => 1,
    }
}

/// `max(1, floor(ceil(base * role) / penalty))`
pub fn effective_limit(base: u32, role: Option<GlobalRole>, violations: u32) -> u32 {
    let scaled = (base as f64 * role_multiplier(role)).ceil() as u32;

    (scaled / penalty_multiplier(violations)).max(1)
}
