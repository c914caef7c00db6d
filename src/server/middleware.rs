//! Request middleware: rate limiting of the API and HTTP metrics.

use std::{
    net::{IpAddr, SocketAddr},
    time::Instant,
};

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::server::{
    error::{resilience::ResilienceError, Error},
    model::{app::AppState, auth::bearer_token},
    resilience::rate_limit::RateLimitDecision,
};

pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
static X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Address of the client.
///
/// `X-Forwarded-For` is only read when the peer is a trusted proxy; the client is then the
/// right-most hop not added by a trusted proxy. Untrusted peers are identified by their own
/// address so a forged header cannot change their identity.
fn client_ip(request: &Request, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
    else {
        return "unknown".to_string();
    };
    if !trusted_proxies.contains(&peer) {
        return peer.to_string();
    }

    let hops: Vec<IpAddr> = request
        .headers()
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|hop| hop.trim().parse().ok())
        .collect();

    hops.iter()
        .rev()
        .find(|hop| !trusted_proxies.contains(hop))
        .or(hops.first())
        .copied()
        .unwrap_or(peer)
        .to_string()
}

fn set_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(X_RATELIMIT_LIMIT.clone(), HeaderValue::from(decision.limit));
    headers.insert(
        X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(decision.remaining),
    );
}

/// Applies the sliding-window limit to the client address and, when a valid bearer token
/// is present, to the user. The request passes only if both identifiers are within budget.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = client_ip(&request, &state.trusted_proxies);
    let user = bearer_token(request.headers()).and_then(|token| state.jwt.decode(token).ok());
    let role = user.as_ref().map(|claims| claims.role);

    let mut identifiers = vec![format!("ip:{}", ip)];
    if let Some(claims) = &user {
        identifiers.push(format!("user:{}", claims.sub));
    }

    let mut decisions = Vec::with_capacity(identifiers.len());
    for identifier in &identifiers {
        match state.rate_limiter.check(identifier, role).await {
            Ok(decision) => decisions.push(decision),
            Err(err) => return err.into_response(),
        }
    }

    // The blocked decision with the longest wait, else the one with the least remaining budget
    let Some(decision) = decisions.into_iter().min_by_key(|decision| {
        (
            decision.allowed,
            std::cmp::Reverse(decision.retry_after_secs.unwrap_or(0)),
            decision.remaining,
        )
    }) else {
        return next.run(request).await;
    };

    if let Some(retry_after_secs) = decision.retry_after_secs.filter(|_| !decision.allowed) {
        tracing::warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");

        let mut response =
            Error::from(ResilienceError::RateLimited { retry_after_secs }).into_response();
        set_limit_headers(response.headers_mut(), &decision);
        return response;
    }

    let mut response = next.run(request).await;
    set_limit_headers(response.headers_mut(), &decision);

    response
}

/// Records the count and latency of every routed request
pub async fn track_metrics(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    state
        .metrics
        .record_request(&method, &route, response.status().as_u16(), started.elapsed());

    response
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use topsteel_test_utils::prelude::*;
    use tower::ServiceExt;

    use super::*;
    use crate::server::{
        metrics::GaugeSnapshot,
        resilience::rate_limit::{RateLimitConfig, RateLimiter},
        util::test::app_state,
    };

    const PROXY: [u8; 4] = [10, 0, 0, 1];

    async fn state_with_limit(test: &TestSetup, max_requests: u32) -> AppState {
        let mut state = app_state(test).await;
        state.rate_limiter = RateLimiter::new_memory(
            RateLimitConfig {
                window: Duration::from_secs(60),
                max_requests,
            },
            "topsteel-test",
        );
        state.with_trusted_proxies(vec![IpAddr::from(PROXY)])
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/api/ping", get(|| async { "pong" }))
            .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
            .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
            .with_state(state)
    }

    /// A request relayed by the trusted proxy on behalf of `ip`
    fn request(ip: &str, bearer: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder()
            .uri("/api/ping")
            .header(X_FORWARDED_FOR, ip)
            .extension(ConnectInfo(SocketAddr::from((PROXY, 4000))));
        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, bearer);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn direct_request(peer: [u8; 4], forwarded: &str) -> Request {
        axum::http::Request::builder()
            .uri("/api/ping")
            .header(X_FORWARDED_FOR, forwarded)
            .extension(ConnectInfo(SocketAddr::from((peer, 4000))))
            .body(Body::empty())
            .unwrap()
    }

    mod client_ip {
        use super::*;

        /// Expect the right-most hop not added by a trusted proxy
        #[test]
        fn reads_forwarded_hops_behind_proxy() {
            let trusted = [IpAddr::from(PROXY), IpAddr::from([10, 0, 0, 2])];

            let request = direct_request(PROXY, "198.51.100.1, 203.0.113.9, 10.0.0.2");

            assert_eq!(client_ip(&request, &trusted), "203.0.113.9");
        }

        /// Expect a forged header from an untrusted peer to be ignored
        #[test]
        fn ignores_header_from_untrusted_peer() {
            let trusted = [IpAddr::from(PROXY)];

            let request = direct_request([192, 0, 2, 1], "203.0.113.9");

            assert_eq!(client_ip(&request, &trusted), "192.0.2.1");
            assert_eq!(client_ip(&request, &[]), "192.0.2.1");
        }

        #[test]
        fn falls_back_to_peer_without_header() {
            let trusted = [IpAddr::from(PROXY)];
            let mut request = direct_request(PROXY, "not-an-ip");
            request.headers_mut().remove(X_FORWARDED_FOR);

            assert_eq!(client_ip(&request, &trusted), "10.0.0.1");
        }
    }

    /// Expect an untrusted client rotating forged headers to keep a single budget
    #[tokio::test]
    async fn spoofed_header_shares_budget() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let app = app(state_with_limit(&test, 1).await);

        let first = app
            .clone()
            .oneshot(direct_request([192, 0, 2, 1], "203.0.113.1"))
            .await
            .unwrap();
        let second = app
            .clone()
            .oneshot(direct_request([192, 0, 2, 1], "203.0.113.2"))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        Ok(())
    }

    /// Expect 429 with Retry-After once the address exhausts its budget
    #[tokio::test]
    async fn blocks_after_budget() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let app = app(state_with_limit(&test, 2).await);

        let first = app.clone().oneshot(request("203.0.113.9", None)).await.unwrap();
        let second = app.clone().oneshot(request("203.0.113.9", None)).await.unwrap();
        let third = app.clone().oneshot(request("203.0.113.9", None)).await.unwrap();
        let other = app.clone().oneshot(request("198.51.100.7", None)).await.unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[&X_RATELIMIT_LIMIT], "2");
        assert_eq!(first.headers()[&X_RATELIMIT_REMAINING], "1");
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(third.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(other.status(), StatusCode::OK);

        Ok(())
    }

    /// Expect the role multiplier to raise the budget of authenticated users
    #[tokio::test]
    async fn applies_role_budget() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let app = app(state_with_limit(&test, 2).await);
        let bearer = test.auth().bearer(1, TestRole::Admin, None)?;

        let response = app
            .oneshot(request("203.0.113.9", Some(&bearer)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&X_RATELIMIT_LIMIT], "10");

        Ok(())
    }

    /// Expect routed requests to show up in the exposition
    #[tokio::test]
    async fn records_request_metrics() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let state = state_with_limit(&test, 10).await;
        let app = app(state.clone());

        app.oneshot(request("203.0.113.9", None)).await.unwrap();

        let exposition = state.metrics.render(GaugeSnapshot {
            breakers: Vec::new(),
            tenant_connections: 0,
            tenant_connections_opened: 0,
            rate_limit_blocked: 0,
        });
        assert!(exposition.contains(r#"route="/api/ping""#));

        Ok(())
    }
}
