use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{ProjetPriorite, ProjetStatut};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projet")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub reference: String,
    pub client_id: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub statut: ProjetStatut,
    pub priorite: ProjetPriorite,
    pub date_debut: Option<Date>,
    pub date_fin_prevue: Option<Date>,
    pub montant_ht: f64,
    pub taux_tva: f64,
    pub montant_ttc: f64,
    pub avancement: i32,
    pub responsable: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
