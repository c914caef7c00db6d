use axum::http::{Method, StatusCode};
use entity::sea_orm_active_enums::SocieteStatus;
use serde_json::Value;
use topsteel_test_utils::prelude::*;

use crate::util::{json, test_app};

/// Expect 401 without a bearer token
#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<(), TestError> {
    let app = test_app().await?;

    let response = app
        .send(Method::GET, "/api/clients", None, Some(TEST_SOCIETE_CODE), None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = json(response).await;
    assert!(body["error"].is_string());

    Ok(())
}

/// Expect 400 without the X-Tenant header
#[tokio::test]
async fn missing_tenant_header_is_bad_request() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(Method::GET, "/api/clients", Some(&bearer), None, None)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 404 for an unknown societe code
#[tokio::test]
async fn unknown_tenant_is_not_found() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, None)?;

    let response = app
        .send(Method::GET, "/api/clients", Some(&bearer), Some("NOPE"), None)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect 403 when a user of another societe selects the tenant
#[tokio::test]
async fn foreign_tenant_is_forbidden() -> Result<(), TestError> {
    let app = test_app().await?;
    let other = app
        .test
        .societe()
        .insert_societe("OTHER", SocieteStatus::Active)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::Admin, Some(other.id))?;

    let response = app
        .send(Method::GET, "/api/clients", Some(&bearer), Some(TEST_SOCIETE_CODE), None)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect a super admin of another societe to be let in
#[tokio::test]
async fn super_admin_crosses_tenants() -> Result<(), TestError> {
    let app = test_app().await?;
    let other = app
        .test
        .societe()
        .insert_societe("OTHER", SocieteStatus::Active)
        .await?;
    let bearer = app
        .test
        .auth()
        .bearer(1, TestRole::SuperAdmin, Some(other.id))?;

    let response = app
        .send(Method::GET, "/api/clients", Some(&bearer), Some(TEST_SOCIETE_CODE), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// Expect 403 for a suspended societe
#[tokio::test]
async fn inactive_tenant_is_forbidden() -> Result<(), TestError> {
    let app = test_app().await?;
    app.test
        .societe()
        .insert_societe("SLEEP", SocieteStatus::Suspended)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, None)?;

    let response = app
        .send(Method::GET, "/api/clients", Some(&bearer), Some("SLEEP"), None)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}
