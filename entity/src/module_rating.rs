use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "module_rating")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub module_id: i32,
    pub user_id: i32,
    pub rating: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub version: Option<String>,
    pub is_visible: bool,
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
}

impl Related<super::marketplace_module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MarketplaceModule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
