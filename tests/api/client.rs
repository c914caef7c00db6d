use axum::http::{Method, StatusCode};
use entity::sea_orm_active_enums::{ClientStatus, ClientType, ProjetStatut};
use serde_json::{json as body, Value};
use topsteel_test_utils::prelude::*;

use crate::util::{json, test_app};

/// Expect 201 with a generated code and the prospect status by default
#[tokio::test]
async fn create_client() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            "/api/clients",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "denomination": "Ateliers Martin", "ville": "Lyon" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let client: Value = json(response).await;
    assert_eq!(client["denomination"], "Ateliers Martin");
    assert_eq!(client["status"], "PROSPECT");
    assert!(!client["code"].as_str().unwrap().is_empty());

    Ok(())
}

/// Expect 400 with field details for an empty denomination
#[tokio::test]
async fn create_client_validation() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            "/api/clients",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "denomination": "  " })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json(response).await;
    assert_eq!(error["details"][0]["field"], "denomination");

    Ok(())
}

/// Expect 409 when reusing a client code
#[tokio::test]
async fn create_client_duplicate_code() -> Result<(), TestError> {
    let app = test_app().await?;
    app.test.tenant().insert_active_client("CLI-0001").await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            "/api/clients",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "code": "CLI-0001", "denomination": "Doublon" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect conversion to activate a prospect
#[tokio::test]
async fn convert_prospect() -> Result<(), TestError> {
    let app = test_app().await?;
    let prospect = app
        .test
        .tenant()
        .insert_client("PRO-0001", ClientType::Client, ClientStatus::Prospect)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            &format!("/api/clients/{}/convert", prospect.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let client: Value = json(response).await;
    assert_eq!(client["status"], "ACTIF");

    Ok(())
}

/// Expect 409 when deleting a client that still has projets, 204 otherwise
#[tokio::test]
async fn delete_client() -> Result<(), TestError> {
    let app = test_app().await?;
    let busy = app.test.tenant().insert_active_client("CLI-0001").await?;
    let idle = app.test.tenant().insert_active_client("CLI-0002").await?;
    app.test
        .tenant()
        .insert_projet("PRJ-0001", busy.id, ProjetStatut::EnCours, None)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let conflict = app
        .send(
            Method::DELETE,
            &format!("/api/clients/{}", busy.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;
    let deleted = app
        .send(
            Method::DELETE,
            &format!("/api/clients/{}", idle.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;
    let missing = app
        .send(
            Method::GET,
            &format!("/api/clients/{}", idle.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;

    assert_eq!(conflict.status(), StatusCode::CONFLICT);
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect an out of range page number to return an empty page
#[tokio::test]
async fn list_clients_huge_page() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::GET,
            "/api/clients?page=18446744073709551615",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = json(response).await;
    assert_eq!(page["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(page["page"], 1_000_000);

    Ok(())
}
