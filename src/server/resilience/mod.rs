//! Circuit breakers and the request rate limiter.

pub mod circuit_breaker;
pub mod rate_limit;
