use axum::http::{Method, StatusCode};
use serde_json::{json as body, Value};
use topsteel_test_utils::prelude::*;

use crate::util::{json, test_app};

/// Expect 403 for non-admin callers on admin routes
#[tokio::test]
async fn admin_routes_require_admin() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::Manager, Some(1))?;

    let response = app
        .send(Method::GET, "/api/admin/parameters", Some(&bearer), None, None)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect a parameter to be created, read back and refused when mistyped
#[tokio::test]
async fn parameter_lifecycle() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::Admin, None)?;

    let created = app
        .send(
            Method::POST,
            "/api/admin/parameters",
            Some(&bearer),
            None,
            Some(body!({
                "key": "stock_alert_days",
                "value": "7",
                "parameter_type": "NUMBER",
                "category": "stock"
            })),
        )
        .await;
    let mistyped = app
        .send(
            Method::PUT,
            "/api/admin/parameters/stock_alert_days",
            Some(&bearer),
            None,
            Some(body!({ "value": "a week" })),
        )
        .await;
    let fetched = app
        .send(
            Method::GET,
            "/api/admin/parameters/stock_alert_days",
            Some(&bearer),
            None,
            None,
        )
        .await;

    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(mistyped.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fetched.status(), StatusCode::OK);
    let parameter: Value = json(fetched).await;
    assert_eq!(parameter["value"], "7");

    Ok(())
}

/// Expect every breaker to be listed closed and an unknown one to 404 on reset
#[tokio::test]
async fn circuit_breakers() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::Admin, None)?;

    let listed = app
        .send(Method::GET, "/api/admin/circuit-breakers", Some(&bearer), None, None)
        .await;
    let reset = app
        .send(
            Method::POST,
            "/api/admin/circuit-breakers/pg-dump/reset",
            Some(&bearer),
            None,
            None,
        )
        .await;
    let unknown = app
        .send(
            Method::POST,
            "/api/admin/circuit-breakers/mailer/reset",
            Some(&bearer),
            None,
            None,
        )
        .await;

    let breakers: Vec<Value> = json(listed).await;
    assert_eq!(breakers.len(), 3);
    assert!(breakers.iter().all(|breaker| breaker["state"] == "CLOSED"));
    assert_eq!(reset.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect the shared schema created from the entities to pass the integrity check
#[tokio::test]
async fn shared_integrity() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::Admin, None)?;

    let response = app
        .send(
            Method::GET,
            "/api/admin/database/integrity",
            Some(&bearer),
            None,
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = json(response).await;
    assert_eq!(report["database"], "shared");
    assert_eq!(report["summary"]["missing"], 0);

    Ok(())
}

/// Expect rate limiter stats from the in-memory backend
#[tokio::test]
async fn rate_limit_stats() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::Admin, None)?;

    let response = app
        .send(Method::GET, "/api/admin/rate-limit/stats", Some(&bearer), None, None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let stats: Value = json(response).await;
    assert_eq!(stats["backend"], "memory");
    assert!(stats["checks"].as_u64().unwrap() >= 1);

    Ok(())
}
