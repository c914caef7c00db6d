//! Application harness over the in-memory databases of a [`TestSetup`].

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use serde::de::DeserializeOwned;
use topsteel::server::{
    model::{app::AppState, auth::JwtKeys},
    resilience::rate_limit::{RateLimitConfig, RateLimiter},
    router::router,
    service::backup::BackupConfig,
};
use topsteel_test_utils::prelude::*;
use tower::ServiceExt;

pub struct TestApp {
    pub test: TestSetup,
    pub state: AppState,
    pub router: Router,
}

/// Every table created, the [`TEST_SOCIETE_CODE`] societe active and its database registered
pub async fn test_app() -> Result<TestApp, TestError> {
    let test = test_setup_with_all_tables!()?;
    test.societe().insert_active_societe().await?;

    let state = AppState::new(
        test.state.db.clone(),
        "sqlite:///nonexistent/topsteel/{tenant}.db",
        RateLimiter::new_memory(
            RateLimitConfig {
                window: Duration::from_secs(60),
                max_requests: 1000,
            },
            "topsteel-it",
        ),
        JwtKeys::new(TEST_JWT_SECRET),
        BackupConfig {
            dir: std::env::temp_dir().join("topsteel-it-backups"),
            pg_dump_path: "pg_dump".to_string(),
            psql_path: "psql".to_string(),
            database_url: "sqlite::memory:".to_string(),
        },
    )
    .unwrap();
    state
        .tenants
        .insert(TEST_SOCIETE_CODE, test.state.tenant_db.clone())
        .await;

    let router = router(state.clone());

    Ok(TestApp {
        test,
        state,
        router,
    })
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        tenant: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, bearer);
        }
        if let Some(tenant) = tenant {
            builder = builder.header("X-Tenant", tenant);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
