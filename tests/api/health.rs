use axum::http::{Method, StatusCode};
use serde_json::Value;
use topsteel_test_utils::prelude::*;

use crate::util::{json, test_app, text};

/// Expect ok with the tenant connection counted
#[tokio::test]
async fn health_ok() -> Result<(), TestError> {
    let app = test_app().await?;

    let response = app.send(Method::GET, "/health", None, None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let health: Value = json(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["checks"]["tenants"]["connected"], 1);

    Ok(())
}

#[tokio::test]
async fn liveness_and_readiness() -> Result<(), TestError> {
    let app = test_app().await?;

    let live = app.send(Method::GET, "/health/live", None, None, None).await;
    let ready = app.send(Method::GET, "/health/ready", None, None, None).await;

    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(ready.status(), StatusCode::OK);

    Ok(())
}

/// Expect served requests and breaker gauges in the exposition
#[tokio::test]
async fn metrics_exposition() -> Result<(), TestError> {
    let app = test_app().await?;
    app.send(Method::GET, "/api/marketplace/modules", None, None, None)
        .await;

    let response = app.send(Method::GET, "/metrics", None, None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let exposition = text(response).await;
    assert!(exposition.contains("http_requests_total"));
    assert!(exposition.contains(r#"route="/api/marketplace/modules""#));
    assert!(exposition.contains(r#"circuit_breaker_state{name="tenant-database"} 0"#));

    Ok(())
}

/// Expect the OpenAPI document to be served
#[tokio::test]
async fn openapi_document() -> Result<(), TestError> {
    let app = test_app().await?;

    let response = app
        .send(Method::GET, "/api/docs/openapi.json", None, None, None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc: Value = json(response).await;
    assert!(doc["paths"]["/api/clients"].is_object());

    Ok(())
}
