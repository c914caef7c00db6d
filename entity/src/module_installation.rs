use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::InstallationStatus;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationLogEntry {
    /// `INFO`, `WARN` or `ERROR`
    pub level: String,
    pub message: String,
    pub at: DateTime,
}

/// Append-only installation journal, stored as JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct InstallationLogs(pub Vec<InstallationLogEntry>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "module_installation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub societe_id: i32,
    pub module_id: i32,
    pub installed_version: String,
    pub status: InstallationStatus,
    pub configuration: Option<Json>,
    pub installed_by: Option<i32>,
    pub installed_at: Option<DateTime>,
    pub uninstalled_by: Option<i32>,
    pub uninstalled_at: Option<DateTime>,
    pub failure_reason: Option<String>,
    pub logs: InstallationLogs,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::marketplace_module::Entity",
        from = "Column::ModuleId",
        to = "super::marketplace_module::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    MarketplaceModule,
    #[sea_orm(
        belongs_to = "super::societe::Entity",
        from = "Column::SocieteId",
        to = "super::societe::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Societe,
}

impl Related<super::marketplace_module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MarketplaceModule.def()
    }
}

impl Related<super::societe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Societe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
