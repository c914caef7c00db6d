use axum::http::{Method, StatusCode};
use entity::sea_orm_active_enums::ProjetStatut;
use serde_json::{json as body, Value};
use topsteel_test_utils::prelude::*;

use crate::util::{json, test_app};

/// Expect the statut filter to keep only matching projets
#[tokio::test]
async fn list_by_statut() -> Result<(), TestError> {
    let app = test_app().await?;
    let client = app.test.tenant().insert_active_client("CLI-0001").await?;
    app.test
        .tenant()
        .insert_projet("PRJ-0001", client.id, ProjetStatut::EnCours, None)
        .await?;
    app.test
        .tenant()
        .insert_projet("PRJ-0002", client.id, ProjetStatut::Devis, None)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::GET,
            "/api/projets?statut=EN_COURS",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = json(response).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["reference"], "PRJ-0001");

    Ok(())
}

/// Expect a validation error on client_id when the client does not exist
#[tokio::test]
async fn create_for_unknown_client() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            "/api/projets",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "client_id": 42, "description": "Hangar agricole" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json(response).await;
    assert_eq!(error["details"][0]["field"], "client_id");

    Ok(())
}

/// Expect completing a projet to set its progress to 100
#[tokio::test]
async fn complete_projet() -> Result<(), TestError> {
    let app = test_app().await?;
    let client = app.test.tenant().insert_active_client("CLI-0001").await?;
    let projet = app
        .test
        .tenant()
        .insert_projet("PRJ-0001", client.id, ProjetStatut::EnCours, None)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::PUT,
            &format!("/api/projets/{}/statut", projet.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "statut": "TERMINE" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let projet: Value = json(response).await;
    assert_eq!(projet["statut"], "TERMINE");
    assert_eq!(projet["avancement"], 100);

    Ok(())
}
