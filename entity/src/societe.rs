use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::SocieteStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "societe")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub nom: String,
    pub status: SocieteStatus,
    pub database_name: String,
    pub max_users: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::module_installation::Entity")]
    ModuleInstallation,
}

impl Related<super::module_installation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleInstallation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
