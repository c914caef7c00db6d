use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{ClientStatus, ClientType};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientDto {
    pub id: i32,
    pub code: String,
    #[schema(value_type = String, example = "CLIENT")]
    pub client_type: ClientType,
    #[schema(value_type = String, example = "ACTIF")]
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
    pub notes: Option<String>,
    pub suspension_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::client::Model> for ClientDto {
    fn from(client: entity::client::Model) -> Self {
        Self {
            id: client.id,
            code: client.code,
            client_type: client.client_type,
            status: client.status,
            denomination: client.denomination,
            siret: client.siret,
            numero_tva: client.numero_tva,
            contact_principal: client.contact_principal,
            email: client.email,
            telephone: client.telephone,
            adresse: client.adresse,
            code_postal: client.code_postal,
            ville: client.ville,
            pays: client.pays,
            plafond_credit: client.plafond_credit,
            taux_remise: client.taux_remise,
            notes: client.notes,
            suspension_reason: client.suspension_reason,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

/// Body of `POST /api/clients`; `code` is generated when omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateClientDto {
    pub code: Option<String>,
    #[schema(value_type = Option<String>, example = "CLIENT")]
    pub client_type: Option<ClientType>,
    #[schema(value_type = Option<String>, example = "PROSPECT")]
    pub status: Option<ClientStatus>,
    pub denomination: String,
    pub siret: Option<String>,
    pub numero_tva: Option<String>,
    pub contact_principal: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub adresse: Option<String>,
    pub code_postal: Option<String>,
    pub ville: Option<String>,
    pub pays: Option<String>,
    pub plafond_credit: Option<f64>,
    pub taux_remise: Option<f64>,
    pub notes: Option<String>,
}

/// Body of `PUT /api/clients/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateClientDto {
    pub code: Option<String>,
    #[schema(value_type = Option<String>)]
    pub client_type: Option<ClientType>,
    #[schema(value_type = Option<String>)]
    pub status: Option<ClientStatus>,
    pub denomination: Option<String>,
    pub siret: Option<String>,
    pub numero_tva: Option<String>,
    pub contact_principal: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub adresse: Option<String>,
    pub code_postal: Option<String>,
    pub ville: Option<String>,
    pub pays: Option<String>,
    pub plafond_credit: Option<f64>,
    pub taux_remise: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuspendClientDto {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientFilter {
    #[param(value_type = Option<String>)]
    pub client_type: Option<ClientType>,
    #[param(value_type = Option<String>)]
    pub status: Option<ClientStatus>,
    pub ville: Option<String>,
    /// Matches part of the denomination
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ClientFilter {
    pub fn pagination(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ClientStatsDto {
    pub total: u64,
    pub clients: u64,
    pub fournisseurs: u64,
    pub mixtes: u64,
    pub actifs: u64,
    pub inactifs: u64,
    pub suspendus: u64,
    pub prospects: u64,
}
