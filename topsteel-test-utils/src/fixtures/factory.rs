//! Factory functions for in-memory models.
//!
//! These build models with standard test values without touching a database, for unit
//! tests of pure functions.

use chrono::Utc;
use entity::{
    material::Dimensions,
    sea_orm_active_enums::{MaterialShape, MaterialStatus, MaterialType, ProjetPriorite, ProjetStatut},
};

use crate::model::{MaterialModel, ProjetModel};

/// Create a mock material with the given shape and stock.
pub fn mock_material_model(forme: MaterialShape, stock_physique: f64) -> MaterialModel {
    let now = Utc::now().naive_utc();

    MaterialModel {
        id: 1,
        reference: "AC-PL-000001".to_string(),
        nom: "Tole S235".to_string(),
        material_type: MaterialType::Acier,
        forme,
        status: MaterialStatus::Actif,
        nuance: Some("S235".to_string()),
        unite: "KG".to_string(),
        dimensions: Dimensions::default(),
        poids_unitaire: None,
        densite: Some(7.85),
        prix_unitaire: Some(2.5),
        stock_physique,
        stock_reserve: 0.0,
        stock_mini: 0.0,
        stock_maxi: 0.0,
        emplacement: None,
        dangereux: false,
        date_dernier_inventaire: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock projet in the given status.
pub fn mock_projet_model(statut: ProjetStatut) -> ProjetModel {
    let now = Utc::now().naive_utc();

    ProjetModel {
        id: 1,
        reference: "PRJ-2025-0001".to_string(),
        client_id: 1,
        description: "Charpente metallique".to_string(),
        statut,
        priorite: ProjetPriorite::Normale,
        date_debut: None,
        date_fin_prevue: None,
        montant_ht: 1000.0,
        taux_tva: 20.0,
        montant_ttc: 1200.0,
        avancement: 0,
        responsable: None,
        created_at: now,
        updated_at: now,
    }
}
