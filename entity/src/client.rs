use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{ClientStatus, ClientType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub client_type: ClientType,
    pub status: ClientStatus,
    pub denomination: String,
    pub siret: Option<String>,
    pub numero_tva: Option<String>,
    pub contact_principal: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub adresse: Option<String>,
    pub code_postal: Option<String>,
    pub ville: Option<String>,
    pub pays: String,
    pub plafond_credit: Option<f64>,
    pub taux_remise: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub suspension_reason: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::projet::Entity")]
    Projet,
}

impl Related<super::projet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
