use std::collections::BTreeMap;

use chrono::Utc;
use entity::{
    material::Dimensions,
    sea_orm_active_enums::{MaterialShape, MaterialStatus, MaterialType, MovementStatus, MovementType},
};
use sea_orm::{ActiveEnum, ActiveValue, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{FieldError, PageDto},
        material::{
            CreateMaterialDto, InventoryDto, MaterialCreatedDto, MaterialDto, MaterialFilter,
            ReorderItemDto, UpdateMaterialDto, ValuationDto, ValuationEntryDto,
        },
    },
    server::{
        data::{material::MaterialRepository, material_movement::MaterialMovementRepository},
        error::{business::BusinessError, Error},
        service::movement,
        util::{math::round2, reference::material_reference},
    },
};

const DEFAULT_UNITE: &str = "KG";
/// Relative gap between declared and computed weight above which a warning is raised
const WEIGHT_TOLERANCE: f64 = 0.10;

pub struct MaterialService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MaterialService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &MaterialFilter) -> Result<PageDto<MaterialDto>, Error> {
        let pagination = filter.pagination();
        let (materials, total) = MaterialRepository::new(self.db).list(filter).await?;

        Ok(PageDto {
            items: materials.into_iter().map(MaterialDto::from).collect(),
            total,
            page: pagination.page(),
            limit: pagination.limit(),
        })
    }

    pub async fn get(&self, id: i32) -> Result<MaterialDto, Error> {
        Ok(self.find(id).await?.into())
    }

    /// Creates a material and reports dimension and weight inconsistencies as warnings
    pub async fn create(&self, material: CreateMaterialDto) -> Result<MaterialCreatedDto, Error> {
        let repo = MaterialRepository::new(self.db);

        let stock = StockFigures {
            physique: material.stock_physique.unwrap_or(0.0),
            reserve: material.stock_reserve.unwrap_or(0.0),
            mini: material.stock_mini.unwrap_or(0.0),
            maxi: material.stock_maxi.unwrap_or(0.0),
        };
        let mut errors = Vec::new();
        if material.nom.trim().is_empty() {
            errors.push(FieldError::new("nom", "must not be empty"));
        }
        errors.extend(stock.validate());
        errors.extend(validate_physical(
            material.prix_unitaire,
            material.poids_unitaire,
            material.densite,
        ));
        BusinessError::check(errors)?;

        let material_type = material.material_type.unwrap_or(MaterialType::Autre);
        let forme = material.forme.unwrap_or(MaterialShape::Autre);
        let reference = match material.reference.as_deref().map(str::trim) {
            Some(reference) if !reference.is_empty() => {
                if repo.reference_exists(reference).await? {
                    return Err(BusinessError::Conflict(format!(
                        "Material reference {} already exists",
                        reference
                    ))
                    .into());
                }
                reference.to_string()
            }
            _ => self.next_reference(material_type, forme).await?,
        };

        let dimensions: Dimensions = material.dimensions.map(Into::into).unwrap_or_default();
        let warnings = consistency_warnings(
            forme,
            &dimensions,
            material.poids_unitaire,
            material.densite,
        );

        let created = repo
            .create(entity::material::ActiveModel {
                reference: ActiveValue::Set(reference),
                nom: ActiveValue::Set(material.nom.trim().to_string()),
                material_type: ActiveValue::Set(material_type),
                forme: ActiveValue::Set(forme),
                status: ActiveValue::Set(MaterialStatus::Actif),
                nuance: ActiveValue::Set(material.nuance),
                unite: ActiveValue::Set(
                    material.unite.unwrap_or_else(|| DEFAULT_UNITE.to_string()),
                ),
                dimensions: ActiveValue::Set(dimensions),
                poids_unitaire: ActiveValue::Set(material.poids_unitaire),
                densite: ActiveValue::Set(material.densite),
                prix_unitaire: ActiveValue::Set(material.prix_unitaire),
                stock_physique: ActiveValue::Set(stock.physique),
                stock_reserve: ActiveValue::Set(stock.reserve),
                stock_mini: ActiveValue::Set(stock.mini),
                stock_maxi: ActiveValue::Set(stock.maxi),
                emplacement: ActiveValue::Set(material.emplacement),
                dangereux: ActiveValue::Set(material.dangereux.unwrap_or(false)),
                date_dernier_inventaire: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;
        tracing::info!(
            material_id = %created.id,
            reference = %created.reference,
            warnings = warnings.len(),
            "Material created"
        );

        Ok(MaterialCreatedDto {
            material: created.into(),
            warnings,
        })
    }

    /// Applies the provided fields; the reference cannot change and physical stock only
    /// moves through movements and inventories
    pub async fn update(&self, id: i32, changes: UpdateMaterialDto) -> Result<MaterialDto, Error> {
        let existing = self.find(id).await?;

        let stock = StockFigures {
            physique: existing.stock_physique,
            reserve: changes.stock_reserve.unwrap_or(existing.stock_reserve),
            mini: changes.stock_mini.unwrap_or(existing.stock_mini),
            maxi: changes.stock_maxi.unwrap_or(existing.stock_maxi),
        };
        let mut errors = Vec::new();
        if changes.reference.as_ref().is_some_and(|r| *r != existing.reference) {
            errors.push(FieldError::new("reference", "cannot be changed"));
        }
        if changes.nom.as_ref().is_some_and(|n| n.trim().is_empty()) {
            errors.push(FieldError::new("nom", "must not be empty"));
        }
        errors.extend(stock.validate());
        errors.extend(validate_physical(
            changes.prix_unitaire,
            changes.poids_unitaire,
            changes.densite,
        ));
        BusinessError::check(errors)?;

        let mut material: entity::material::ActiveModel = existing.into();
        if let Some(nom) = changes.nom {
            material.nom = ActiveValue::Set(nom.trim().to_string());
        }
        if let Some(status) = changes.status {
            material.status = ActiveValue::Set(status);
        }
        if changes.nuance.is_some() {
            material.nuance = ActiveValue::Set(changes.nuance);
        }
        if let Some(unite) = changes.unite {
            material.unite = ActiveValue::Set(unite);
        }
        if let Some(dimensions) = changes.dimensions {
            material.dimensions = ActiveValue::Set(dimensions.into());
        }
        if changes.poids_unitaire.is_some() {
            material.poids_unitaire = ActiveValue::Set(changes.poids_unitaire);
        }
        if changes.densite.is_some() {
            material.densite = ActiveValue::Set(changes.densite);
        }
        if changes.prix_unitaire.is_some() {
            material.prix_unitaire = ActiveValue::Set(changes.prix_unitaire);
        }
        if changes.emplacement.is_some() {
            material.emplacement = ActiveValue::Set(changes.emplacement);
        }
        if let Some(dangereux) = changes.dangereux {
            material.dangereux = ActiveValue::Set(dangereux);
        }
        material.stock_reserve = ActiveValue::Set(stock.reserve);
        material.stock_mini = ActiveValue::Set(stock.mini);
        material.stock_maxi = ActiveValue::Set(stock.maxi);

        Ok(MaterialRepository::new(self.db).update(material).await?.into())
    }

    /// Deletes a material without stock and without movement history
    pub async fn delete(&self, id: i32) -> Result<(), Error> {
        let material = self.find(id).await?;

        if material.stock_physique > 0.0 {
            return Err(BusinessError::Conflict(format!(
                "Material {} still has {} in stock",
                material.reference, material.stock_physique
            ))
            .into());
        }
        let movements = MaterialMovementRepository::new(self.db)
            .count_by_material(id)
            .await?;
        if movements > 0 {
            return Err(BusinessError::Conflict(format!(
                "Material {} has {} stock movement(s)",
                material.reference, movements
            ))
            .into());
        }

        MaterialRepository::new(self.db).delete(id).await?;
        tracing::info!(material_id = %id, "Material deleted");

        Ok(())
    }

    /// Records a physical count: sets the stock and logs a validated `INVENTAIRE` movement
    pub async fn inventory(
        &self,
        id: i32,
        inventory: InventoryDto,
        user_id: i32,
    ) -> Result<MaterialDto, Error> {
        if inventory.stock_physique < 0.0 {
            return Err(BusinessError::Validation(vec![FieldError::new(
                "stock_physique",
                "must not be negative",
            )])
            .into());
        }

        let txn = self.db.begin().await?;

        let existing = MaterialRepository::new(&txn)
            .get(id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Material", id))?;
        let now = Utc::now().naive_utc();
        let stock_avant = existing.stock_physique;
        let reference = movement::next_reference(&txn, MovementType::Inventaire).await?;

        MaterialMovementRepository::new(&txn)
            .create(entity::material_movement::ActiveModel {
                reference: ActiveValue::Set(reference),
                material_id: ActiveValue::Set(id),
                movement_type: ActiveValue::Set(MovementType::Inventaire),
                status: ActiveValue::Set(MovementStatus::Valide),
                quantite: ActiveValue::Set(inventory.stock_physique),
                stock_avant: ActiveValue::Set(stock_avant),
                stock_apres: ActiveValue::Set(inventory.stock_physique),
                valeur_unitaire: ActiveValue::Set(existing.prix_unitaire),
                valeur_totale: ActiveValue::Set(
                    existing
                        .prix_unitaire
                        .map(|prix| round2(prix * inventory.stock_physique)),
                ),
                motif: ActiveValue::Set(inventory.motif),
                emplacement_source: ActiveValue::Set(None),
                emplacement_destination: ActiveValue::Set(existing.emplacement.clone()),
                created_by: ActiveValue::Set(Some(user_id)),
                validated_by: ActiveValue::Set(Some(user_id)),
                validated_at: ActiveValue::Set(Some(now)),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .await?;

        let mut material: entity::material::ActiveModel = existing.into();
        material.stock_physique = ActiveValue::Set(inventory.stock_physique);
        material.date_dernier_inventaire = ActiveValue::Set(Some(now));
        let material = MaterialRepository::new(&txn).update(material).await?;

        txn.commit().await?;
        tracing::info!(
            material_id = %id,
            stock_avant,
            stock_apres = inventory.stock_physique,
            "Inventory recorded"
        );

        Ok(material.into())
    }

    /// Active materials under their minimum, with the quantity bringing them back to target
    pub async fn reorder(&self) -> Result<Vec<ReorderItemDto>, Error> {
        let materials = MaterialRepository::new(self.db).all().await?;

        Ok(materials
            .into_iter()
            .filter(|m| m.status == MaterialStatus::Actif && sous_stock_mini(m))
            .filter_map(|m| {
                let quantite = quantite_a_commander(&m);
                (quantite > 0.0).then(|| ReorderItemDto {
                    material: m.into(),
                    quantite_a_commander: quantite,
                })
            })
            .collect())
    }

    pub async fn valuation(&self) -> Result<ValuationDto, Error> {
        let materials = MaterialRepository::new(self.db).all().await?;

        Ok(compute_valuation(&materials))
    }

    async fn find(&self, id: i32) -> Result<entity::material::Model, Error> {
        MaterialRepository::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Material", id).into())
    }

    async fn next_reference(
        &self,
        material_type: MaterialType,
        forme: MaterialShape,
    ) -> Result<String, Error> {
        let repo = MaterialRepository::new(self.db);
        let mut sequence = repo.count_by_type(material_type).await? + 1;

        loop {
            let reference = material_reference(material_type, forme, sequence);
            if !repo.reference_exists(&reference).await? {
                return Ok(reference);
            }
            sequence += 1;
        }
    }
}

struct StockFigures {
    physique: f64,
    reserve: f64,
    mini: f64,
    maxi: f64,
}

impl StockFigures {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("stock_physique", self.physique),
            ("stock_reserve", self.reserve),
            ("stock_mini", self.mini),
            ("stock_maxi", self.maxi),
        ] {
            if value < 0.0 {
                errors.push(FieldError::new(field, "must not be negative"));
            }
        }
        if self.reserve > self.physique {
            errors.push(FieldError::new(
                "stock_reserve",
                "must not exceed stock_physique",
            ));
        }
        if self.maxi > 0.0 && self.maxi < self.mini {
            errors.push(FieldError::new("stock_maxi", "must not be below stock_mini"));
        }

        errors
    }
}

fn validate_physical(
    prix_unitaire: Option<f64>,
    poids_unitaire: Option<f64>,
    densite: Option<f64>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if prix_unitaire.is_some_and(|p| p < 0.0) {
        errors.push(FieldError::new("prix_unitaire", "must not be negative"));
    }
    if poids_unitaire.is_some_and(|p| p <= 0.0) {
        errors.push(FieldError::new("poids_unitaire", "must be positive"));
    }
    if densite.is_some_and(|d| d <= 0.0) {
        errors.push(FieldError::new("densite", "must be positive"));
    }

    errors
}

/// Non-blocking checks of the dimensions expected for a shape and of the declared weight
///
/// Weight is checked for box-shaped materials: `longueur * largeur * epaisseur` in mm with
/// `densite` in g/cm3 gives kilograms.
pub fn consistency_warnings(
    forme: MaterialShape,
    dimensions: &Dimensions,
    poids_unitaire: Option<f64>,
    densite: Option<f64>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    match forme {
        MaterialShape::Tube if dimensions.diametre.is_none() => {
            warnings.push("A tube should have a diameter".to_string());
        }
        MaterialShape::Plaque
            if dimensions.longueur.is_none()
                || dimensions.largeur.is_none()
                || dimensions.epaisseur.is_none() =>
        {
            warnings.push("A plate should have a length, a width and a thickness".to_string());
        }
        MaterialShape::Barre if dimensions.longueur.is_none() => {
            warnings.push("A bar should have a length".to_string());
        }
        _ => {}
    }

    if let (Some(longueur), Some(largeur), Some(epaisseur), Some(densite), Some(poids)) = (
        dimensions.longueur,
        dimensions.largeur,
        dimensions.epaisseur,
        densite,
        poids_unitaire,
    ) {
        let volume_m3 = (longueur / 1000.0) * (largeur / 1000.0) * (epaisseur / 1000.0);
        let computed = volume_m3 * densite * 1000.0;
        if (computed - poids).abs() / poids > WEIGHT_TOLERANCE {
            warnings.push(format!(
                "Declared weight {}kg differs from computed weight {:.2}kg",
                poids, computed
            ));
        }
    }

    warnings
}

/// Physical stock not held by reservations, never negative
pub fn stock_disponible(material: &entity::material::Model) -> f64 {
    (material.stock_physique - material.stock_reserve).max(0.0)
}

fn en_rupture(material: &entity::material::Model) -> bool {
    stock_disponible(material) <= 0.0
}

fn sous_stock_mini(material: &entity::material::Model) -> bool {
    stock_disponible(material) < material.stock_mini
}

pub fn quantite_a_commander(material: &entity::material::Model) -> f64 {
    let cible = material.stock_maxi.max(material.stock_mini);

    round2(cible - stock_disponible(material))
}

fn compute_valuation(materials: &[entity::material::Model]) -> ValuationDto {
    let mut par_type: BTreeMap<String, (u64, f64)> = BTreeMap::new();
    let mut par_forme: BTreeMap<String, (u64, f64)> = BTreeMap::new();
    let mut valuation = ValuationDto {
        total_materials: materials.len() as u64,
        ..Default::default()
    };

    for material in materials {
        let valeur = material.stock_physique * material.prix_unitaire.unwrap_or(0.0);
        valuation.valeur_totale += valeur;

        for (entries, key) in [
            (&mut par_type, material.material_type.to_value()),
            (&mut par_forme, material.forme.to_value()),
        ] {
            let entry = entries.entry(key).or_default();
            entry.0 += 1;
            entry.1 += valeur;
        }

        if material.stock_physique == 0.0 {
            valuation.sans_stock += 1;
        }
        if en_rupture(material) {
            valuation.en_rupture += 1;
        }
        if sous_stock_mini(material) {
            valuation.sous_stock_mini += 1;
        }
        if material.dangereux {
            valuation.dangereux += 1;
        }
    }

    let to_entries = |entries: BTreeMap<String, (u64, f64)>| {
        entries
            .into_iter()
            .map(|(key, (count, valeur))| ValuationEntryDto {
                key,
                count,
                valeur: round2(valeur),
            })
            .collect()
    };
    valuation.valeur_totale = round2(valuation.valeur_totale);
    valuation.par_type = to_entries(par_type);
    valuation.par_forme = to_entries(par_forme);

    valuation
}
