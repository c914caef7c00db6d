use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{MovementStatus, MovementType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "material_movement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub reference: String,
    pub material_id: i32,
    pub movement_type: MovementType,
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
    pub validated_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material::Entity",
        from = "Column::MaterialId",
        to = "super::material::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Material,
}

impl Related<super::material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Material.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
