//! Stock movements and their effect on material stock.
//!
//! A movement is created as `BROUILLON` and only touches the stock once validated. Creation
//! with `auto_validate` and validation both update the material inside one transaction.

use chrono::Utc;
use entity::sea_orm_active_enums::{MovementStatus, MovementType};
use sea_orm::{ActiveValue, ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::FieldError,
        material::{CreateMovementDto, MovementDto},
    },
    server::{
        data::{material::MaterialRepository, material_movement::MaterialMovementRepository},
        error::{business::BusinessError, Error},
        util::{math::round2, reference::movement_reference},
    },
};

/// Physical stock after applying a movement of `quantite`
///
/// `AJUSTEMENT` and `INVENTAIRE` set the stock to the counted quantity; a transfer only
/// changes the location.
pub fn stock_after(movement_type: MovementType, stock: f64, quantite: f64) -> f64 {
    match movement_type {
        MovementType::Entree => stock + quantite,
        MovementType::Sortie => stock - quantite,
        MovementType::Transfert => stock,
        MovementType::Ajustement | MovementType::Inventaire => quantite,
    }
}

/// Rejects an outgoing movement exceeding the unreserved stock
fn check_available(
    material: &entity::material::Model,
    movement_type: MovementType,
    quantite: f64,
) -> Result<(), BusinessError> {
    let disponible = material.stock_physique - material.stock_reserve;
    if movement_type == MovementType::Sortie && disponible < quantite {
        return Err(BusinessError::InvalidState(format!(
            "Insufficient stock for {}: {} available, {} requested",
            material.reference, disponible, quantite
        )));
    }

    Ok(())
}

/// First free movement reference of the day for `movement_type`
pub(crate) async fn next_reference<C: ConnectionTrait>(
    db: &C,
    movement_type: MovementType,
) -> Result<String, Error> {
    let repo = MaterialMovementRepository::new(db);
    let today = Utc::now().date_naive();
    let mut sequence = repo.count_for_day(today).await? + 1;

    loop {
        let reference = movement_reference(movement_type, today, sequence);
        if !repo.reference_exists(&reference).await? {
            return Ok(reference);
        }
        sequence += 1;
    }
}

pub struct MovementService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MovementService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Movements of a material, newest first
    pub async fn list_by_material(&self, material_id: i32) -> Result<Vec<MovementDto>, Error> {
        self.find_material(self.db, material_id).await?;

        let movements = MaterialMovementRepository::new(self.db)
            .list_by_material(material_id)
            .await?;

        Ok(movements.into_iter().map(MovementDto::from).collect())
    }

    pub async fn create(
        &self,
        material_id: i32,
        movement: CreateMovementDto,
        user_id: i32,
    ) -> Result<MovementDto, Error> {
        let quantite_valid = if movement.movement_type == MovementType::Inventaire {
            movement.quantite >= 0.0
        } else {
            movement.quantite > 0.0
        };
        if !quantite_valid {
            return Err(BusinessError::Validation(vec![FieldError::new(
                "quantite",
                "must be positive",
            )])
            .into());
        }

        let txn = self.db.begin().await?;

        let material = self.find_material(&txn, material_id).await?;
        check_available(&material, movement.movement_type, movement.quantite)?;

        let now = Utc::now().naive_utc();
        let stock_avant = material.stock_physique;
        let stock_apres = stock_after(movement.movement_type, stock_avant, movement.quantite);
        let reference = next_reference(&txn, movement.movement_type).await?;

        let (status, validated_by, validated_at) = if movement.auto_validate {
            (MovementStatus::Valide, Some(user_id), Some(now))
        } else {
            (MovementStatus::Brouillon, None, None)
        };

        let created = MaterialMovementRepository::new(&txn)
            .create(entity::material_movement::ActiveModel {
                reference: ActiveValue::Set(reference),
                material_id: ActiveValue::Set(material_id),
                movement_type: ActiveValue::Set(movement.movement_type),
                status: ActiveValue::Set(status),
                quantite: ActiveValue::Set(movement.quantite),
                stock_avant: ActiveValue::Set(stock_avant),
                stock_apres: ActiveValue::Set(stock_apres),
                valeur_unitaire: ActiveValue::Set(movement.valeur_unitaire),
                valeur_totale: ActiveValue::Set(
                    movement.valeur_unitaire.map(|v| round2(v * movement.quantite)),
                ),
                motif: ActiveValue::Set(movement.motif),
                emplacement_source: ActiveValue::Set(movement.emplacement_source),
                emplacement_destination: ActiveValue::Set(movement.emplacement_destination),
                created_by: ActiveValue::Set(Some(user_id)),
                validated_by: ActiveValue::Set(validated_by),
                validated_at: ActiveValue::Set(validated_at),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .await?;

        if movement.auto_validate {
            set_stock(&txn, material, stock_apres).await?;
        }

        txn.commit().await?;
        tracing::info!(
            movement_id = %created.id,
            reference = %created.reference,
            material_id = %material_id,
            "Stock movement created"
        );

        Ok(created.into())
    }

    /// Applies a `BROUILLON` movement to the current stock of its material
    pub async fn validate(&self, id: i32, user_id: i32) -> Result<MovementDto, Error> {
        let txn = self.db.begin().await?;

        let movement = self.find_draft(&txn, id).await?;
        let material = self.find_material(&txn, movement.material_id).await?;
        check_available(&material, movement.movement_type, movement.quantite)?;

        let stock_avant = material.stock_physique;
        let stock_apres = stock_after(movement.movement_type, stock_avant, movement.quantite);
        set_stock(&txn, material, stock_apres).await?;

        let mut movement: entity::material_movement::ActiveModel = movement.into();
        movement.status = ActiveValue::Set(MovementStatus::Valide);
        movement.stock_avant = ActiveValue::Set(stock_avant);
        movement.stock_apres = ActiveValue::Set(stock_apres);
        movement.validated_by = ActiveValue::Set(Some(user_id));
        movement.validated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
        let movement = MaterialMovementRepository::new(&txn).update(movement).await?;

        txn.commit().await?;
        tracing::info!(movement_id = %id, "Stock movement validated");

        Ok(movement.into())
    }

    pub async fn cancel(&self, id: i32) -> Result<MovementDto, Error> {
        let movement = self.find_draft(self.db, id).await?;

        let mut movement: entity::material_movement::ActiveModel = movement.into();
        movement.status = ActiveValue::Set(MovementStatus::Annule);
        let movement = MaterialMovementRepository::new(self.db)
            .update(movement)
            .await?;
        tracing::info!(movement_id = %id, "Stock movement cancelled");

        Ok(movement.into())
    }

    async fn find_material<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
    ) -> Result<entity::material::Model, Error> {
        MaterialRepository::new(db)
            .get(id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Material", id).into())
    }

    async fn find_draft<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
    ) -> Result<entity::material_movement::Model, Error> {
        let movement = MaterialMovementRepository::new(db)
            .get(id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Movement", id))?;

        if movement.status != MovementStatus::Brouillon {
            return Err(BusinessError::InvalidState(format!(
                "Movement {} is not a draft",
                movement.reference
            ))
            .into());
        }

        Ok(movement)
    }
}

async fn set_stock<C: ConnectionTrait>(
    db: &C,
    material: entity::material::Model,
    stock_physique: f64,
) -> Result<entity::material::Model, Error> {
    let mut material: entity::material::ActiveModel = material.into();
    material.stock_physique = ActiveValue::Set(stock_physique);

    Ok(MaterialRepository::new(db).update(material).await?)
}
