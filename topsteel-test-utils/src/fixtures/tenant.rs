use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{
    ClientStatus, ClientType, MaterialShape, MaterialStatus, MaterialType, MovementStatus,
    MovementType, ProjetPriorite, ProjetStatut,
};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    error::TestError,
    model::{ClientModel, MaterialModel, MovementModel, ProjetModel},
    TestSetup,
};

impl TestSetup {
    /// Fixtures writing to the tenant database.
    pub fn tenant<'a>(&'a self) -> TenantFixtures<'a> {
        TenantFixtures { setup: self }
    }
}

pub struct TenantFixtures<'a> {
    setup: &'a TestSetup,
}

impl<'a> TenantFixtures<'a> {
    pub async fn insert_client(
        &self,
        code: &str,
        client_type: ClientType,
        status: ClientStatus,
    ) -> Result<ClientModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Client::insert(entity::client::ActiveModel {
            code: ActiveValue::Set(code.to_string()),
            client_type: ActiveValue::Set(client_type),
            status: ActiveValue::Set(status),
            denomination: ActiveValue::Set(format!("Entreprise {}", code)),
            siret: ActiveValue::Set(None),
            numero_tva: ActiveValue::Set(None),
            contact_principal: ActiveValue::Set(None),
            email: ActiveValue::Set(None),
            telephone: ActiveValue::Set(None),
            adresse: ActiveValue::Set(None),
            code_postal: ActiveValue::Set(None),
            ville: ActiveValue::Set(Some("Lyon".to_string())),
            pays: ActiveValue::Set("France".to_string()),
            plafond_credit: ActiveValue::Set(None),
            taux_remise: ActiveValue::Set(None),
            notes: ActiveValue::Set(None),
            suspension_reason: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.state.tenant_db)
        .await?)
    }

    /// Inserts an active `CLIENT` type client.
    pub async fn insert_active_client(&self, code: &str) -> Result<ClientModel, TestError> {
        self.insert_client(code, ClientType::Client, ClientStatus::Actif)
            .await
    }

    pub async fn insert_projet(
        &self,
        reference: &str,
        client_id: i32,
        statut: ProjetStatut,
        date_fin_prevue: Option<NaiveDate>,
    ) -> Result<ProjetModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Projet::insert(entity::projet::ActiveModel {
            reference: ActiveValue::Set(reference.to_string()),
            client_id: ActiveValue::Set(client_id),
            description: ActiveValue::Set(format!("Charpente {}", reference)),
            statut: ActiveValue::Set(statut),
            priorite: ActiveValue::Set(ProjetPriorite::Normale),
            date_debut: ActiveValue::Set(None),
            date_fin_prevue: ActiveValue::Set(date_fin_prevue),
            montant_ht: ActiveValue::Set(1000.0),
            taux_tva: ActiveValue::Set(20.0),
            montant_ttc: ActiveValue::Set(1200.0),
            avancement: ActiveValue::Set(0),
            responsable: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.state.tenant_db)
        .await?)
    }

    pub async fn insert_material(
        &self,
        reference: &str,
        stock_physique: f64,
        stock_mini: f64,
        prix_unitaire: Option<f64>,
    ) -> Result<MaterialModel, TestError> {
        self.insert_reserved_material(reference, stock_physique, 0.0, stock_mini, prix_unitaire)
            .await
    }

    /// Inserts an active steel plate with part of its physical stock reserved.
    pub async fn insert_reserved_material(
        &self,
        reference: &str,
        stock_physique: f64,
        stock_reserve: f64,
        stock_mini: f64,
        prix_unitaire: Option<f64>,
    ) -> Result<MaterialModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Material::insert(entity::material::ActiveModel {
            reference: ActiveValue::Set(reference.to_string()),
            nom: ActiveValue::Set(format!("Materiau {}", reference)),
            material_type: ActiveValue::Set(MaterialType::Acier),
            forme: ActiveValue::Set(MaterialShape::Plaque),
            status: ActiveValue::Set(MaterialStatus::Actif),
            nuance: ActiveValue::Set(Some("S235".to_string())),
            unite: ActiveValue::Set("KG".to_string()),
            dimensions: ActiveValue::Set(Default::default()),
            poids_unitaire: ActiveValue::Set(None),
            densite: ActiveValue::Set(None),
            prix_unitaire: ActiveValue::Set(prix_unitaire),
            stock_physique: ActiveValue::Set(stock_physique),
            stock_reserve: ActiveValue::Set(stock_reserve),
            stock_mini: ActiveValue::Set(stock_mini),
            stock_maxi: ActiveValue::Set(0.0),
            emplacement: ActiveValue::Set(None),
            dangereux: ActiveValue::Set(false),
            date_dernier_inventaire: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.state.tenant_db)
        .await?)
    }

    /// Inserts a `BROUILLON` movement that has not touched the material's stock.
    pub async fn insert_draft_movement(
        &self,
        reference: &str,
        material_id: i32,
        movement_type: MovementType,
        quantite: f64,
    ) -> Result<MovementModel, TestError> {
        Ok(
            entity::prelude::MaterialMovement::insert(entity::material_movement::ActiveModel {
                reference: ActiveValue::Set(reference.to_string()),
                material_id: ActiveValue::Set(material_id),
                movement_type: ActiveValue::Set(movement_type),
                status: ActiveValue::Set(MovementStatus::Brouillon),
                quantite: ActiveValue::Set(quantite),
                stock_avant: ActiveValue::Set(0.0),
                stock_apres: ActiveValue::Set(0.0),
                valeur_unitaire: ActiveValue::Set(None),
                valeur_totale: ActiveValue::Set(None),
                motif: ActiveValue::Set(None),
                emplacement_source: ActiveValue::Set(None),
                emplacement_destination: ActiveValue::Set(None),
                created_by: ActiveValue::Set(None),
                validated_by: ActiveValue::Set(None),
                validated_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.tenant_db)
            .await?,
        )
    }
}
