use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{
    MaterialShape, MaterialStatus, MaterialType, MovementStatus, MovementType,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DimensionsDto {
    pub longueur: Option<f64>,
    pub largeur: Option<f64>,
    pub epaisseur: Option<f64>,
    pub diametre: Option<f64>,
}

impl From<entity::material::Dimensions> for DimensionsDto {
    fn from(d: entity::material::Dimensions) -> Self {
        Self {
            longueur: d.longueur,
            largeur: d.largeur,
            epaisseur: d.epaisseur,
            diametre: d.diametre,
        }
    }
}

impl From<DimensionsDto> for entity::material::Dimensions {
    fn from(d: DimensionsDto) -> Self {
        Self {
            longueur: d.longueur,
            largeur: d.largeur,
            epaisseur: d.epaisseur,
            diametre: d.diametre,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaterialDto {
    pub id: i32,
    pub reference: String,
    pub nom: String,
    #[schema(value_type = String, example = "ACIER")]
    pub material_type: MaterialType,
    #[schema(value_type = String, example = "TUBE")]
    pub forme: MaterialShape,
    #[schema(value_type = String, example = "ACTIF")]
    pub status: MaterialStatus,
    pub nuance: Option<String>,
    pub unite: String,
    pub dimensions: DimensionsDto,
    pub poids_unitaire: Option<f64>,
    pub densite: Option<f64>,
    pub prix_unitaire: Option<f64>,
    pub stock_physique: f64,
    pub stock_reserve: f64,
    pub stock_disponible: f64,
    pub stock_mini: f64,
    pub stock_maxi: f64,
    pub emplacement: Option<String>,
    pub dangereux: bool,
    pub date_dernier_inventaire: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::material::Model> for MaterialDto {
    fn from(m: entity::material::Model) -> Self {
        Self {
            id: m.id,
            reference: m.reference,
            nom: m.nom,
            material_type: m.material_type,
            forme: m.forme,
            status: m.status,
            nuance: m.nuance,
            unite: m.unite,
            dimensions: m.dimensions.into(),
            poids_unitaire: m.poids_unitaire,
            densite: m.densite,
            prix_unitaire: m.prix_unitaire,
            stock_physique: m.stock_physique,
            stock_reserve: m.stock_reserve,
            stock_disponible: (m.stock_physique - m.stock_reserve).max(0.0),
            stock_mini: m.stock_mini,
            stock_maxi: m.stock_maxi,
            emplacement: m.emplacement,
            dangereux: m.dangereux,
            date_dernier_inventaire: m.date_dernier_inventaire,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Body of `POST /api/materials`; `reference` is generated when omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateMaterialDto {
    pub reference: Option<String>,
    pub nom: String,
    #[schema(value_type = Option<String>, example = "ACIER")]
    pub material_type: Option<MaterialType>,
    #[schema(value_type = Option<String>, example = "TUBE")]
    pub forme: Option<MaterialShape>,
    pub nuance: Option<String>,
    pub unite: Option<String>,
    pub dimensions: Option<DimensionsDto>,
    pub poids_unitaire: Option<f64>,
    pub densite: Option<f64>,
    pub prix_unitaire: Option<f64>,
    pub stock_physique: Option<f64>,
    pub stock_reserve: Option<f64>,
    pub stock_mini: Option<f64>,
    pub stock_maxi: Option<f64>,
    pub emplacement: Option<String>,
    pub dangereux: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMaterialDto {
    pub reference: Option<String>,
    pub nom: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<MaterialStatus>,
    pub nuance: Option<String>,
    pub unite: Option<String>,
    pub dimensions: Option<DimensionsDto>,
    pub poids_unitaire: Option<f64>,
    pub densite: Option<f64>,
    pub prix_unitaire: Option<f64>,
    pub stock_reserve: Option<f64>,
    pub stock_mini: Option<f64>,
    pub stock_maxi: Option<f64>,
    pub emplacement: Option<String>,
    pub dangereux: Option<bool>,
}

/// A created material along with non-blocking consistency warnings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaterialCreatedDto {
    pub material: MaterialDto,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockCondition {
    /// No available stock left once reservations are subtracted
    Rupture,
    /// Available stock under the configured minimum
    SousMini,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaterialFilter {
    #[param(value_type = Option<String>)]
    pub material_type: Option<MaterialType>,
    #[param(value_type = Option<String>)]
    pub forme: Option<MaterialShape>,
    #[param(value_type = Option<String>)]
    pub status: Option<MaterialStatus>,
    #[param(value_type = Option<String>, example = "sous_mini")]
    pub stock: Option<StockCondition>,
    /// Matches part of the name or reference
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl MaterialFilter {
    pub fn pagination(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryDto {
    pub stock_physique: f64,
    pub motif: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderItemDto {
    pub material: MaterialDto,
    pub quantite_a_commander: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValuationEntryDto {
    pub key: String,
    pub count: u64,
    pub valeur: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ValuationDto {
    pub total_materials: u64,
    pub valeur_totale: f64,
    pub par_type: Vec<ValuationEntryDto>,
    pub par_forme: Vec<ValuationEntryDto>,
    pub sans_stock: u64,
    pub en_rupture: u64,
    pub sous_stock_mini: u64,
    pub dangereux: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementDto {
    pub id: i32,
    pub reference: String,
    pub material_id: i32,
    #[schema(value_type = String, example = "ENTREE")]
    pub movement_type: MovementType,
    #[schema(value_type = String, example = "VALIDE")]
    pub status: MovementStatus,
    pub quantite: f64,
    pub stock_avant: f64,
    pub stock_apres: f64,
    pub valeur_unitaire: Option<f64>,
    pub valeur_totale: Option<f64>,
    pub motif: Option<String>,
    pub emplacement_source: Option<String>,
    pub emplacement_destination: Option<String>,
    pub created_by: Option<i32>,
    pub validated_by: Option<i32>,
    pub validated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<entity::material_movement::Model> for MovementDto {
    fn from(m: entity::material_movement::Model) -> Self {
        Self {
            id: m.id,
            reference: m.reference,
            material_id: m.material_id,
            movement_type: m.movement_type,
            status: m.status,
            quantite: m.quantite,
            stock_avant: m.stock_avant,
            stock_apres: m.stock_apres,
            valeur_unitaire: m.valeur_unitaire,
            valeur_totale: m.valeur_totale,
            motif: m.motif,
            emplacement_source: m.emplacement_source,
            emplacement_destination: m.emplacement_destination,
            created_by: m.created_by,
            validated_by: m.validated_by,
            validated_at: m.validated_at,
            created_at: m.created_at,
        }
    }
}

/// Body of `POST /api/materials/{id}/movements`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMovementDto {
    #[schema(value_type = String, example = "SORTIE")]
    pub movement_type: MovementType,
    pub quantite: f64,
    pub valeur_unitaire: Option<f64>,
    pub motif: Option<String>,
    pub emplacement_source: Option<String>,
    pub emplacement_destination: Option<String>,
    /// Apply the movement to the stock immediately
    #[serde(default)]
    pub auto_validate: bool,
}
