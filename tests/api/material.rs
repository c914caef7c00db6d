use axum::http::{Method, StatusCode};
use entity::sea_orm_active_enums::MovementType;
use serde_json::{json as body, Value};
use topsteel_test_utils::prelude::*;

use crate::util::{json, test_app};

/// Expect a tube without diameter to be created with a warning
#[tokio::test]
async fn create_with_warnings() -> Result<(), TestError> {
    let app = test_app().await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            "/api/materials",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "nom": "Tube rond", "forme": "TUBE", "prix_unitaire": 4.5 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = json(response).await;
    assert_eq!(created["material"]["nom"], "Tube rond");
    assert_eq!(created["warnings"][0], "A tube should have a diameter");

    Ok(())
}

/// Expect an auto-validated entry to raise the stock and show up in the history
#[tokio::test]
async fn entry_movement_updates_stock() -> Result<(), TestError> {
    let app = test_app().await?;
    let material = app
        .test
        .tenant()
        .insert_material("MAT-0001", 10.0, 5.0, Some(2.0))
        .await?;
    let bearer = app.test.auth().bearer(7, TestRole::User, Some(1))?;
    let uri = format!("/api/materials/{}/movements", material.id);

    let created = app
        .send(
            Method::POST,
            &uri,
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "movement_type": "ENTREE", "quantite": 15.0, "auto_validate": true })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let movement: Value = json(created).await;
    assert_eq!(movement["status"], "VALIDE");
    assert_eq!(movement["stock_avant"], 10.0);
    assert_eq!(movement["stock_apres"], 25.0);

    let history = app
        .send(Method::GET, &uri, Some(&bearer), Some(TEST_SOCIETE_CODE), None)
        .await;
    let history: Vec<Value> = json(history).await;
    assert_eq!(history.len(), 1);

    let material = app
        .send(
            Method::GET,
            &format!("/api/materials/{}", material.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;
    let material: Value = json(material).await;
    assert_eq!(material["stock_physique"], 25.0);

    Ok(())
}

/// Expect 400 when an exit exceeds the available stock
#[tokio::test]
async fn exit_beyond_stock_is_rejected() -> Result<(), TestError> {
    let app = test_app().await?;
    let material = app
        .test
        .tenant()
        .insert_material("MAT-0001", 3.0, 0.0, None)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::POST,
            &format!("/api/materials/{}/movements", material.id),
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            Some(body!({ "movement_type": "SORTIE", "quantite": 5.0 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect a draft to be validated once, then refuse a second validation
#[tokio::test]
async fn validate_draft_once() -> Result<(), TestError> {
    let app = test_app().await?;
    let material = app
        .test
        .tenant()
        .insert_material("MAT-0001", 10.0, 0.0, None)
        .await?;
    let draft = app
        .test
        .tenant()
        .insert_draft_movement("MVT-S-20250101-0001", material.id, MovementType::Sortie, 4.0)
        .await?;
    let bearer = app.test.auth().bearer(3, TestRole::User, Some(1))?;
    let uri = format!("/api/movements/{}/validate", draft.id);

    let first = app
        .send(Method::POST, &uri, Some(&bearer), Some(TEST_SOCIETE_CODE), None)
        .await;
    let second = app
        .send(Method::POST, &uri, Some(&bearer), Some(TEST_SOCIETE_CODE), None)
        .await;

    assert_eq!(first.status(), StatusCode::OK);
    let movement: Value = json(first).await;
    assert_eq!(movement["stock_apres"], 6.0);
    assert_eq!(movement["validated_by"], 3);
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect materials under their minimum to be listed with the quantity to order
#[tokio::test]
async fn reorder_list() -> Result<(), TestError> {
    let app = test_app().await?;
    app.test
        .tenant()
        .insert_material("MAT-0001", 2.0, 10.0, None)
        .await?;
    app.test
        .tenant()
        .insert_material("MAT-0002", 50.0, 10.0, None)
        .await?;
    let bearer = app.test.auth().bearer(1, TestRole::User, Some(1))?;

    let response = app
        .send(
            Method::GET,
            "/api/materials/reorder",
            Some(&bearer),
            Some(TEST_SOCIETE_CODE),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let items: Vec<Value> = json(response).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantite_a_commander"], 8.0);

    Ok(())
}
