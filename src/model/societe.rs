use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::SocieteStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SocieteDto {
    pub id: i32,
    pub code: String,
    pub nom: String,
    #[schema(value_type = String, example = "ACTIVE")]
    pub status: SocieteStatus,
    pub database_name: String,
    pub max_users: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::societe::Model> for SocieteDto {
    fn from(s: entity::societe::Model) -> Self {
        Self {
            id: s.id,
            code: s.code,
            nom: s.nom,
            status: s.status,
            database_name: s.database_name,
            max_users: s.max_users,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSocieteDto {
    /// Upper-case tenant code, also used to derive the tenant database name
    pub code: String,
    pub nom: String,
    pub max_users: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSocieteStatusDto {
    #[schema(value_type = String, example = "SUSPENDED")]
    pub status: SocieteStatus,
}
