use axum::http::{Method, StatusCode};
use entity::sea_orm_active_enums::ModuleStatus;
use serde_json::{json as body, Value};
use topsteel_test_utils::prelude::*;

use crate::util::{json, test_app};

/// Expect the public catalog to show only published modules
#[tokio::test]
async fn catalog_is_public() -> Result<(), TestError> {
    let app = test_app().await?;
    app.test
        .marketplace()
        .insert_published_module("quality-control")
        .await?;
    app.test
        .marketplace()
        .insert_module("draft-module", ModuleStatus::Draft, vec![])
        .await?;

    let response = app
        .send(Method::GET, "/api/marketplace/modules", None, None, None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let modules: Vec<Value> = json(response).await;
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0]["module_key"], "quality-control");

    Ok(())
}

/// Expect install to succeed, show up as installed and refuse a second install
#[tokio::test]
async fn install_then_list() -> Result<(), TestError> {
    let app = test_app().await?;
    let module = app
        .test
        .marketplace()
        .insert_published_module("quality-control")
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::Admin, Some(1))?;
    let uri = format!("/api/marketplace/modules/{}/install", module.id);

    let first = app
        .send(Method::POST, &uri, Some(&bearer), Some(TEST_SOCIETE_CODE), None)
        .await;
    let second = app
        .send(Method::POST, &uri, Some(&bearer), Some(TEST_SOCIETE_CODE), None)
        .await;
    let installed = app
        .send(
            Method::GET,
            "/api/marketplace/installed",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;

    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = json(first).await;
    assert_eq!(first["success"], true);
    let second: Value = json(second).await;
    assert_eq!(second["success"], false);
    let installed: Vec<Value> = json(installed).await;
    assert_eq!(installed.len(), 1);

    Ok(())
}

/// Expect a missing dependency to be reported without an error status
#[tokio::test]
async fn install_with_missing_dependency() -> Result<(), TestError> {
    let app = test_app().await?;
    let module = app
        .test
        .marketplace()
        .insert_module("advanced-planning", ModuleStatus::Published, vec!["quality-control"])
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::Admin, Some(1))?;

    let response = app
        .send(
            Method::POST,
            &format!("/api/marketplace/modules/{}/install", module.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let result: Value = json(response).await;
    assert_eq!(result["success"], false);

    Ok(())
}

/// Expect 400 for a rating outside 1 to 5
#[tokio::test]
async fn rating_out_of_range() -> Result<(), TestError> {
    let app = test_app().await?;
    let module = app
        .test
        .marketplace()
        .insert_published_module("quality-control")
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            &format!("/api/marketplace/modules/{}/rate", module.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "rating": 6 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect module creation to require the admin role
#[tokio::test]
async fn create_requires_admin() -> Result<(), TestError> {
    let app = test_app().await?;
    let module = body!({
        "module_key": "hr-planning",
        "display_name": "Planning RH",
        "description": "Planification des equipes",
        "category": "HR",
        "publisher": "TopSteel",
        "version": "1.0.0",
        "pricing": { "type": "FREE" }
    });
    let user = app.test.auth().bearer(1, TestRole::User, Some(1))?;
    let admin = app.test.auth().bearer(2, TestRole::Admin, Some(1))?;

    let forbidden = app
        .send(
            Method::POST,
            "/api/admin/marketplace/modules",
            Some(&user),
            None,
            Some(module.clone()),
        )
        .await;
    let created = app
        .send(
            Method::POST,
            "/api/admin/marketplace/modules",
            Some(&admin),
            None,
            Some(module),
        )
        .await;

    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = json(created).await;
    assert_eq!(created["status"], "DRAFT");

    Ok(())
}
