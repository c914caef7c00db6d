//! Prometheus metrics of the HTTP layer and the resilience machinery.
//!
//! Request counters and latencies are recorded as requests complete. Gauges describing
//! current state (breaker states, open tenant connections, blocked requests) are refreshed
//! each time `/metrics` is scraped.

use std::time::Duration;

use metrics::{counter, gauge, histogram, with_local_recorder};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusRecorder};

use crate::server::{error::Error, resilience::circuit_breaker::CircuitState};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const RATE_LIMIT_BLOCKED_TOTAL: &str = "rate_limit_blocked_total";
pub const CIRCUIT_BREAKER_STATE: &str = "circuit_breaker_state";
pub const TENANT_CONNECTIONS: &str = "tenant_connections";
pub const TENANT_CONNECTIONS_OPENED_TOTAL: &str = "tenant_connections_opened_total";

const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Point-in-time values exported as gauges
pub struct GaugeSnapshot {
    pub breakers: Vec<(String, CircuitState)>,
    pub tenant_connections: usize,
    pub tenant_connections_opened: u64,
    pub rate_limit_blocked: u64,
}

/// Recorder owned by the application state rather than installed globally, so several
/// instances (one per test) can coexist in a process.
pub struct Metrics {
    recorder: PrometheusRecorder,
}

impl Metrics {
    pub fn new() -> Result<Self, Error> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
                &LATENCY_BUCKETS,
            )?
            .build_recorder();

        Ok(Self { recorder })
    }

    pub fn record_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let method = method.to_string();
        let route = route.to_string();

        with_local_recorder(&self.recorder, || {
            counter!(
                HTTP_REQUESTS_TOTAL,
                "method" => method.clone(),
                "route" => route.clone(),
                "status" => status.to_string()
            )
            .increment(1);
            histogram!(
                HTTP_REQUEST_DURATION_SECONDS,
                "method" => method,
                "route" => route
            )
            .record(elapsed.as_secs_f64());
        });
    }

    /// Refreshes the state gauges and renders the text exposition format
    pub fn render(&self, snapshot: GaugeSnapshot) -> String {
        with_local_recorder(&self.recorder, || {
            for (name, state) in snapshot.breakers {
                gauge!(CIRCUIT_BREAKER_STATE, "name" => name).set(state_value(state));
            }
            gauge!(TENANT_CONNECTIONS).set(snapshot.tenant_connections as f64);
            counter!(TENANT_CONNECTIONS_OPENED_TOTAL).absolute(snapshot.tenant_connections_opened);
            counter!(RATE_LIMIT_BLOCKED_TOTAL).absolute(snapshot.rate_limit_blocked);
        });

        self.recorder.handle().render()
    }
}

fn state_value(state: CircuitState) -> f64 {
    match state {
        CircuitState::Closed => 0.0,
        CircuitState::Open => 1.0,
        CircuitState::HalfOpen => 2.0,
    }
}
