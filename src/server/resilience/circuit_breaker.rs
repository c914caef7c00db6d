//! Circuit breakers guarding calls to external resources.
//!
//! A breaker starts `Closed`. Once at least `volume_threshold` calls were recorded within the
//! rolling window and the failure percentage reaches `error_threshold_percentage`, it opens and
//! rejects every call with [`ResilienceError::CircuitOpen`]. After `reset_timeout` a single
//! trial call is let through (`HalfOpen`): success closes the circuit, failure re-opens it.
//! Calls exceeding `timeout` count as failures.

use std::{collections::VecDeque, future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::{
    model::admin::{CircuitBreakerDto, CircuitStateDto},
    server::error::{resilience::ResilienceError, Error},
};

pub const TENANT_DATABASE: &str = "tenant-database";
pub const PG_DUMP: &str = "pg-dump";
pub const PSQL: &str = "psql";

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Maximum duration of a single call
    pub timeout: Duration,
    /// Failure percentage within the rolling window that opens the circuit
    pub error_threshold_percentage: u32,
    /// Minimum number of calls in the rolling window before the circuit may open
    pub volume_threshold: usize,
    pub rolling_window: Duration,
    /// Time spent open before a trial call is allowed
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            error_threshold_percentage: 50,
            volume_threshold: 5,
            rolling_window: Duration::from_secs(10),
            reset_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl From<CircuitState> for CircuitStateDto {
    fn from(state: CircuitState) -> Self {
        match state {
            CircuitState::Closed => Self::Closed,
            CircuitState::Open => Self::Open,
            CircuitState::HalfOpen => Self::HalfOpen,
        }
    }
}

struct BreakerState {
    circuit: CircuitState,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
    /// (recorded at, succeeded)
    window: VecDeque<(Instant, bool)>,
    successes: u64,
    failures: u64,
    timeouts: u64,
    rejections: u64,
    last_failure_at: Option<DateTime<Utc>>,
}

pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    state: std::sync::Mutex<BreakerState>,
}

/// Admission ticket for one call; a trial permit dropped without an outcome frees the
/// half-open slot again.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if self.trial && !self.settled {
            self.breaker.lock().trial_in_flight = false;
        }
    }
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: std::sync::Mutex::new(BreakerState {
                circuit: CircuitState::Closed,
                opened_at: None,
                trial_in_flight: false,
                window: VecDeque::new(),
                successes: 0,
                failures: 0,
                timeouts: 0,
                rejections: 0,
                last_failure_at: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `operation` through the breaker.
    ///
    /// # Returns
    /// - `Err(ResilienceError::CircuitOpen)` without polling `operation` when the circuit is open
    /// - `Err(ResilienceError::Timeout)` when `operation` exceeds the configured timeout
    /// - the operation's own result otherwise
    pub async fn call<T, E, F>(&self, operation: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<Error>,
    {
        let mut permit = self.acquire()?;

        let result = tokio::time::timeout(self.config.timeout, operation).await;
        permit.settled = true;

        match result {
            Ok(Ok(value)) => {
                self.on_success(permit.trial);
                Ok(value)
            }
            Ok(Err(err)) => {
                self.on_failure(permit.trial, false);
                Err(err.into())
            }
            Err(_) => {
                self.on_failure(permit.trial, true);
                Err(ResilienceError::Timeout {
                    name: self.name.clone(),
                    after: self.config.timeout,
                }
                .into())
            }
        }
    }

    pub fn state(&self) -> CircuitState {
        let mut state = self.lock();
        self.refresh(&mut state);
        state.circuit
    }

    /// Forces the circuit closed and clears the rolling window.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.circuit = CircuitState::Closed;
        state.opened_at = None;
        state.trial_in_flight = false;
        state.window.clear();

        tracing::info!(breaker = %self.name, "Circuit breaker reset");
    }

    pub fn snapshot(&self) -> CircuitBreakerDto {
        let mut state = self.lock();
        self.refresh(&mut state);

        CircuitBreakerDto {
            name: self.name.clone(),
            state: state.circuit.into(),
            successes: state.successes,
            failures: state.failures,
            timeouts: state.timeouts,
            rejections: state.rejections,
            last_failure_at: state.last_failure_at,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        // A poisoned lock only means another caller panicked mid-update; the counters are
        // still usable.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Moves an open circuit to half-open once the reset timeout elapsed.
    fn refresh(&self, state: &mut BreakerState) {
        if state.circuit == CircuitState::Open {
            let elapsed = state
                .opened_at
                .map(|opened_at| opened_at.elapsed())
                .unwrap_or(Duration::MAX);

            if elapsed >= self.config.reset_timeout {
                state.circuit = CircuitState::HalfOpen;
                state.trial_in_flight = false;
            }
        }
    }

    fn acquire(&self) -> Result<Permit<'_>, Error> {
        let mut state = self.lock();
        self.refresh(&mut state);

        let trial = match state.circuit {
            CircuitState::Closed => false,
            CircuitState::HalfOpen if !state.trial_in_flight => {
                state.trial_in_flight = true;
                true
            }
            CircuitState::Open | CircuitState::HalfOpen => {
                state.rejections += 1;
                return Err(ResilienceError::CircuitOpen(self.name.clone()).into());
            }
        };

        Ok(Permit {
            breaker: self,
            trial,
            settled: false,
        })
    }

    fn on_success(&self, trial: bool) {
        let mut state = self.lock();
        state.successes += 1;

        if trial {
            state.circuit = CircuitState::Closed;
            state.opened_at = None;
            state.trial_in_flight = false;
            state.window.clear();

            tracing::info!(breaker = %self.name, "Circuit breaker closed after successful trial");
            return;
        }

        let now = Instant::now();
        state.window.push_back((now, true));
        self.prune(&mut state, now);
    }

    fn on_failure(&self, trial: bool, timed_out: bool) {
        let mut state = self.lock();
        let now = Instant::now();

        state.failures += 1;
        if timed_out {
            state.timeouts += 1;
        }
        state.last_failure_at = Some(Utc::now());

        if trial {
            self.open(&mut state, now);
            return;
        }

        state.window.push_back((now, false));
        self.prune(&mut state, now);

        let total = state.window.len();
        let failed = state.window.iter().filter(|(_, ok)| !ok).count();

        if state.circuit == CircuitState::Closed
            && total >= self.config.volume_threshold
            && failed * 100 >= self.config.error_threshold_percentage as usize * total
        {
            self.open(&mut state, now);
        }
    }

    fn open(&self, state: &mut BreakerState, now: Instant) {
        state.circuit = CircuitState::Open;
        state.opened_at = Some(now);
        state.trial_in_flight = false;
        state.window.clear();

        tracing::warn!(
            breaker = %self.name,
            reset_after = ?self.config.reset_timeout,
            "Circuit breaker opened"
        );
    }

    fn prune(&self, state: &mut BreakerState, now: Instant) {
        while let Some((at, _)) = state.window.front() {
            if now.duration_since(*at) > self.config.rolling_window {
                state.window.pop_front();
            } else {
                break;
            }
        }
    }
}

/// The breakers of the application, one per guarded resource.
#[derive(Clone)]
pub struct CircuitBreakers {
    tenant_database: Arc<CircuitBreaker>,
    pg_dump: Arc<CircuitBreaker>,
    psql: Arc<CircuitBreaker>,
}

impl CircuitBreakers {
    pub fn new() -> Self {
        Self::with_tool_timeout(Duration::from_secs(30 * 60))
    }

    /// Breakers whose `pg_dump` and `psql` calls time out after `tool_timeout`
    pub fn with_tool_timeout(tool_timeout: Duration) -> Self {
        let tool_config = CircuitBreakerConfig {
            timeout: tool_timeout,
            ..Default::default()
        };

        Self {
            tenant_database: Arc::new(CircuitBreaker::new(
                TENANT_DATABASE,
                CircuitBreakerConfig::default(),
            )),
            pg_dump: Arc::new(CircuitBreaker::new(PG_DUMP, tool_config.clone())),
            psql: Arc::new(CircuitBreaker::new(PSQL, tool_config)),
        }
    }

    pub fn tenant_database(&self) -> Arc<CircuitBreaker> {
        self.tenant_database.clone()
    }

    pub fn pg_dump(&self) -> Arc<CircuitBreaker> {
        self.pg_dump.clone()
    }

    pub fn psql(&self) -> Arc<CircuitBreaker> {
        self.psql.clone()
    }

    pub fn all(&self) -> [&Arc<CircuitBreaker>; 3] {
        [&self.tenant_database, &self.pg_dump, &self.psql]
    }

    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.all()
            .into_iter()
            .find(|breaker| breaker.name() == name)
            .cloned()
    }

    /// Names of the breakers currently rejecting calls.
    pub fn open_names(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|breaker| breaker.state() == CircuitState::Open)
            .map(|breaker| breaker.name().to_string())
            .collect()
    }
}

impl Default for CircuitBreakers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sea_orm::DbErr;

    use super::*;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                timeout: Duration::from_millis(100),
                error_threshold_percentage: 50,
                volume_threshold: 4,
                rolling_window: Duration::from_secs(10),
                reset_timeout: Duration::from_secs(30),
            },
        )
    }

    async fn fail(breaker: &CircuitBreaker) -> Result<(), Error> {
        breaker
            .call(async { Err::<(), _>(DbErr::Custom("boom".to_string())) })
            .await
    }

    async fn succeed(breaker: &CircuitBreaker) -> Result<(), Error> {
        breaker.call(async { Ok::<(), DbErr>(()) }).await
    }

    /// Expect the circuit to stay closed below the volume threshold
    #[tokio::test(start_paused = true)]
    async fn stays_closed_below_volume_threshold() {
        let breaker = breaker();

        for _ in 0..3 {
            assert!(fail(&breaker).await.is_err());
        }

        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    /// Expect the circuit to open once failures reach the threshold percentage
    #[tokio::test(start_paused = true)]
    async fn opens_when_error_threshold_reached() {
        let breaker = breaker();

        succeed(&breaker).await.unwrap();
        succeed(&breaker).await.unwrap();
        let _ = fail(&breaker).await;
        let _ = fail(&breaker).await;

        assert_eq!(breaker.state(), CircuitState::Open);

        let result = succeed(&breaker).await;
        assert!(matches!(
            result,
            Err(Error::ResilienceError(ResilienceError::CircuitOpen(_)))
        ));
        assert_eq!(breaker.snapshot().rejections, 1);
    }

    /// Expect a successful trial after the reset timeout to close the circuit
    #[tokio::test(start_paused = true)]
    async fn closes_after_successful_trial() {
        let breaker = breaker();
        for _ in 0..4 {
            let _ = fail(&breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        succeed(&breaker).await.unwrap();

        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    /// Expect a failed trial to re-open the circuit
    #[tokio::test(start_paused = true)]
    async fn reopens_after_failed_trial() {
        let breaker = breaker();
        for _ in 0..4 {
            let _ = fail(&breaker).await;
        }

        tokio::time::advance(Duration::from_secs(31)).await;
        let _ = fail(&breaker).await;

        assert_eq!(breaker.state(), CircuitState::Open);
    }

    /// Expect slow calls to fail with Timeout and count as failures
    #[tokio::test(start_paused = true)]
    async fn times_out_slow_calls() {
        let breaker = breaker();

        let result = breaker
            .call(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<(), DbErr>(())
            })
            .await;

        assert!(matches!(
            result,
            Err(Error::ResilienceError(ResilienceError::Timeout { .. }))
        ));
        let snapshot = breaker.snapshot();
        assert_eq!(snapshot.timeouts, 1);
        assert_eq!(snapshot.failures, 1);
    }

    /// Expect reset to close an open circuit immediately
    #[tokio::test(start_paused = true)]
    async fn reset_closes_circuit() {
        let breaker = breaker();
        for _ in 0..4 {
            let _ = fail(&breaker).await;
        }

        breaker.reset();

        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(succeed(&breaker).await.is_ok());
    }

    #[test]
    fn registry_finds_breakers_by_name() {
        let breakers = CircuitBreakers::new();

        assert!(breakers.get(TENANT_DATABASE).is_some());
        assert!(breakers.get(PG_DUMP).is_some());
        assert!(breakers.get("unknown").is_none());
        assert!(breakers.open_names().is_empty());
    }
}
