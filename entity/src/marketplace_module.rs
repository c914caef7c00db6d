use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::{ModuleCategory, ModuleStatus};

/// Pricing model of a marketplace module, stored as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Pricing {
    /// `FREE`, `ONE_TIME` or `SUBSCRIPTION`
    #[serde(rename = "type")]
    pub pricing_type: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

impl Pricing {
    pub fn is_free(&self) -> bool {
        self.pricing_type == "FREE"
    }
}

/// JSON encoded list of strings (module keys, permissions, routes).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "marketplace_module")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub module_key: String,
    pub display_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub short_description: Option<String>,
    pub category: ModuleCategory,
    pub publisher: String,
    pub version: String,
    pub status: ModuleStatus,
    pub pricing: Pricing,
    pub dependencies: StringList,
    pub permissions: StringList,
    pub api_routes: StringList,
    pub menu_configuration: Option<Json>,
    pub icon: Option<String>,
    pub download_count: i32,
    pub rating_average: f64,
    pub rating_count: i32,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::module_installation::Entity")]
    ModuleInstallation,
    #[sea_orm(has_many = "super::module_rating::Entity")]
    ModuleRating,
}

impl Related<super::module_installation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleInstallation.def()
    }
}

impl Related<super::module_rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleRating.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
