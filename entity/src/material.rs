use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::{MaterialShape, MaterialStatus, MaterialType};

/// Dimensions in millimetres, stored as JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Dimensions {
    pub longueur: Option<f64>,
    pub largeur: Option<f64>,
    pub epaisseur: Option<f64>,
    pub diametre: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "material")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub reference: String,
    pub nom: String,
    pub material_type: MaterialType,
    pub forme: MaterialShape,
    pub status: MaterialStatus,
    pub nuance: Option<String>,
    pub unite: String,
    pub dimensions: Dimensions,
    pub poids_unitaire: Option<f64>,
    pub densite: Option<f64>,
    pub prix_unitaire: Option<f64>,
    pub stock_physique: f64,
    pub stock_reserve: f64,
    pub stock_mini: f64,
    pub stock_maxi: f64,
    pub emplacement: Option<String>,
    pub dangereux: bool,
    pub date_dernier_inventaire: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::material_movement::Entity")]
    MaterialMovement,
}

impl Related<super::material_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialMovement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
