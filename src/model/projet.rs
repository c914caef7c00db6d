use chrono::{NaiveDate, NaiveDateTime};
use entity::sea_orm_active_enums::{ProjetPriorite, ProjetStatut};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjetDto {
    pub id: i32,
    pub reference: String,
    pub client_id: i32,
    pub description: String,
    #[schema(value_type = String, example = "EN_COURS")]
    pub statut: ProjetStatut,
    #[schema(value_type = String, example = "NORMALE")]
    pub priorite: ProjetPriorite,
    pub date_debut: Option<NaiveDate>,
    pub date_fin_prevue: Option<NaiveDate>,
    pub montant_ht: f64,
    pub taux_tva: f64,
    pub montant_ttc: f64,
    pub avancement: i32,
    pub responsable: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::projet::Model> for ProjetDto {
    fn from(projet: entity::projet::Model) -> Self {
        Self {
            id: projet.id,
            reference: projet.reference,
            client_id: projet.client_id,
            description: projet.description,
            statut: projet.statut,
            priorite: projet.priorite,
            date_debut: projet.date_debut,
            date_fin_prevue: projet.date_fin_prevue,
            montant_ht: projet.montant_ht,
            taux_tva: projet.taux_tva,
            montant_ttc: projet.montant_ttc,
            avancement: projet.avancement,
            responsable: projet.responsable,
            created_at: projet.created_at,
            updated_at: projet.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateProjetDto {
    pub client_id: i32,
    pub description: String,
    #[schema(value_type = Option<String>)]
    pub priorite: Option<ProjetPriorite>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin_prevue: Option<NaiveDate>,
    pub montant_ht: Option<f64>,
    pub taux_tva: Option<f64>,
    pub responsable: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProjetDto {
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub priorite: Option<ProjetPriorite>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin_prevue: Option<NaiveDate>,
    pub montant_ht: Option<f64>,
    pub taux_tva: Option<f64>,
    pub avancement: Option<i32>,
    pub responsable: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeStatutDto {
    #[schema(value_type = String, example = "EN_COURS")]
    pub statut: ProjetStatut,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjetFilter {
    #[param(value_type = Option<String>, example = "EN_COURS")]
    pub statut: Option<ProjetStatut>,
    #[param(value_type = Option<String>)]
    pub priorite: Option<ProjetPriorite>,
    pub client_id: Option<i32>,
    /// Matches part of the reference or description
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ProjetFilter {
    pub fn pagination(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatutCountDto {
    #[schema(value_type = String)]
    pub statut: ProjetStatut,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProjetStatsDto {
    pub total: u64,
    pub par_statut: Vec<StatutCountDto>,
    pub en_retard: u64,
    pub avancement_moyen: f64,
    pub montant_total_ht: f64,
}
