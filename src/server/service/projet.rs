use chrono::{Datelike, NaiveDate, Utc};
use entity::sea_orm_active_enums::{ProjetPriorite, ProjetStatut};
use sea_orm::{ActiveValue, DatabaseConnection, Iterable};

use crate::{
    model::{
        api::{FieldError, PageDto},
        projet::{
            CreateProjetDto, ProjetDto, ProjetFilter, ProjetStatsDto, StatutCountDto,
            UpdateProjetDto,
        },
    },
    server::{
        data::{client::ClientRepository, projet::ProjetRepository},
        error::{business::BusinessError, Error},
        util::{
            math::{montant_ttc, round2},
            reference::projet_reference,
        },
    },
};

const DEFAULT_TAUX_TVA: f64 = 20.0;

/// Whether a projet may move from `from` to `to`
///
/// `TERMINE` and `ANNULE` are final; every other statut can be cancelled.
pub fn can_transition(from: ProjetStatut, to: ProjetStatut) -> bool {
    use ProjetStatut::*;

    matches!(
        (from, to),
        (Devis, EnAttente | Accepte | Annule)
            | (EnAttente, Accepte | Annule)
            | (Accepte, EnCours | Annule)
            | (EnCours, Termine | Annule)
    )
}

fn is_final(statut: ProjetStatut) -> bool {
    matches!(statut, ProjetStatut::Termine | ProjetStatut::Annule)
}

pub struct ProjetService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProjetService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &ProjetFilter) -> Result<PageDto<ProjetDto>, Error> {
        let pagination = filter.pagination();
        let (projets, total) = ProjetRepository::new(self.db).list(filter).await?;

        Ok(PageDto {
            items: projets.into_iter().map(ProjetDto::from).collect(),
            total,
            page: pagination.page(),
            limit: pagination.limit(),
        })
    }

    pub async fn get(&self, id: i32) -> Result<ProjetDto, Error> {
        Ok(self.find(id).await?.into())
    }

    /// Creates a projet in `DEVIS` with a reference of the current year
    pub async fn create(&self, projet: CreateProjetDto) -> Result<ProjetDto, Error> {
        let montant_ht = projet.montant_ht.unwrap_or(0.0);
        let taux_tva = projet.taux_tva.unwrap_or(DEFAULT_TAUX_TVA);

        let mut errors = Vec::new();
        if projet.description.trim().is_empty() {
            errors.push(FieldError::new("description", "must not be empty"));
        }
        errors.extend(validate_amounts(montant_ht, taux_tva));
        errors.extend(validate_dates(projet.date_debut, projet.date_fin_prevue));
        if ClientRepository::new(self.db)
            .get(projet.client_id)
            .await?
            .is_none()
        {
            errors.push(FieldError::new("client_id", "client does not exist"));
        }
        BusinessError::check(errors)?;

        let reference = self.next_reference(Utc::now().year()).await?;

        let created = ProjetRepository::new(self.db)
            .create(entity::projet::ActiveModel {
                reference: ActiveValue::Set(reference),
                client_id: ActiveValue::Set(projet.client_id),
                description: ActiveValue::Set(projet.description.trim().to_string()),
                statut: ActiveValue::Set(ProjetStatut::Devis),
                priorite: ActiveValue::Set(projet.priorite.unwrap_or(ProjetPriorite::Normale)),
                date_debut: ActiveValue::Set(projet.date_debut),
                date_fin_prevue: ActiveValue::Set(projet.date_fin_prevue),
                montant_ht: ActiveValue::Set(round2(montant_ht)),
                taux_tva: ActiveValue::Set(taux_tva),
                montant_ttc: ActiveValue::Set(montant_ttc(montant_ht, taux_tva)),
                avancement: ActiveValue::Set(0),
                responsable: ActiveValue::Set(projet.responsable),
                ..Default::default()
            })
            .await?;
        tracing::info!(projet_id = %created.id, reference = %created.reference, "Projet created");

        Ok(created.into())
    }

    /// Applies the provided fields and recomputes `montant_ttc`
    pub async fn update(&self, id: i32, changes: UpdateProjetDto) -> Result<ProjetDto, Error> {
        let existing = self.find(id).await?;

        let montant_ht = changes.montant_ht.unwrap_or(existing.montant_ht);
        let taux_tva = changes.taux_tva.unwrap_or(existing.taux_tva);
        let date_debut = changes.date_debut.or(existing.date_debut);
        let date_fin_prevue = changes.date_fin_prevue.or(existing.date_fin_prevue);

        let mut errors = Vec::new();
        if changes.description.as_ref().is_some_and(|d| d.trim().is_empty()) {
            errors.push(FieldError::new("description", "must not be empty"));
        }
        if changes.avancement.is_some_and(|a| !(0..=100).contains(&a)) {
            errors.push(FieldError::new("avancement", "must be between 0 and 100"));
        }
        errors.extend(validate_amounts(montant_ht, taux_tva));
        errors.extend(validate_dates(date_debut, date_fin_prevue));
        BusinessError::check(errors)?;

        let mut projet: entity::projet::ActiveModel = existing.into();
        if let Some(description) = changes.description {
            projet.description = ActiveValue::Set(description.trim().to_string());
        }
        if let Some(priorite) = changes.priorite {
            projet.priorite = ActiveValue::Set(priorite);
        }
        if let Some(avancement) = changes.avancement {
            projet.avancement = ActiveValue::Set(avancement);
        }
        if changes.responsable.is_some() {
            projet.responsable = ActiveValue::Set(changes.responsable);
        }
        projet.date_debut = ActiveValue::Set(date_debut);
        projet.date_fin_prevue = ActiveValue::Set(date_fin_prevue);
        projet.montant_ht = ActiveValue::Set(round2(montant_ht));
        projet.taux_tva = ActiveValue::Set(taux_tva);
        projet.montant_ttc = ActiveValue::Set(montant_ttc(montant_ht, taux_tva));

        Ok(ProjetRepository::new(self.db).update(projet).await?.into())
    }

    /// Moves a projet along its lifecycle; reaching `TERMINE` completes the avancement
    pub async fn change_statut(&self, id: i32, statut: ProjetStatut) -> Result<ProjetDto, Error> {
        let existing = self.find(id).await?;

        if !can_transition(existing.statut, statut) {
            return Err(BusinessError::InvalidState(format!(
                "Projet {} cannot move from {:?} to {:?}",
                existing.reference, existing.statut, statut
            ))
            .into());
        }

        let mut projet: entity::projet::ActiveModel = existing.into();
        projet.statut = ActiveValue::Set(statut);
        if statut == ProjetStatut::Termine {
            projet.avancement = ActiveValue::Set(100);
        }

        let projet = ProjetRepository::new(self.db).update(projet).await?;
        tracing::info!(projet_id = %id, statut = ?statut, "Projet statut changed");

        Ok(projet.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), Error> {
        self.find(id).await?;
        ProjetRepository::new(self.db).delete(id).await?;

        Ok(())
    }

    pub async fn stats(&self) -> Result<ProjetStatsDto, Error> {
        let projets = ProjetRepository::new(self.db).all().await?;
        let today = Utc::now().date_naive();

        Ok(compute_stats(&projets, today))
    }

    async fn find(&self, id: i32) -> Result<entity::projet::Model, Error> {
        ProjetRepository::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Projet", id).into())
    }

    async fn next_reference(&self, year: i32) -> Result<String, Error> {
        let repo = ProjetRepository::new(self.db);
        let mut sequence = repo.count_for_year(year).await? + 1;

        loop {
            let reference = projet_reference(year, sequence);
            if !repo.reference_exists(&reference).await? {
                return Ok(reference);
            }
            sequence += 1;
        }
    }
}

fn validate_amounts(montant_ht: f64, taux_tva: f64) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if montant_ht < 0.0 {
        errors.push(FieldError::new("montant_ht", "must not be negative"));
    }
    if !(0.0..=100.0).contains(&taux_tva) {
        errors.push(FieldError::new("taux_tva", "must be between 0 and 100"));
    }

    errors
}

fn validate_dates(debut: Option<NaiveDate>, fin: Option<NaiveDate>) -> Vec<FieldError> {
    match (debut, fin) {
        (Some(debut), Some(fin)) if fin < debut => vec![FieldError::new(
            "date_fin_prevue",
            "must not be before date_debut",
        )],
        _ => Vec::new(),
    }
}

fn compute_stats(projets: &[entity::projet::Model], today: NaiveDate) -> ProjetStatsDto {
    let total = projets.len() as u64;

    let par_statut = ProjetStatut::iter()
        .map(|statut| StatutCountDto {
            statut,
            count: projets.iter().filter(|p| p.statut == statut).count() as u64,
        })
        .collect();

    let en_retard = projets
        .iter()
        .filter(|p| !is_final(p.statut) && p.date_fin_prevue.is_some_and(|fin| fin < today))
        .count() as u64;

    let avancement_moyen = if projets.is_empty() {
        0.0
    } else {
        round2(projets.iter().map(|p| p.avancement as f64).sum::<f64>() / total as f64)
    };

    ProjetStatsDto {
        total,
        par_statut,
        en_retard,
        avancement_moyen,
        montant_total_ht: round2(projets.iter().map(|p| p.montant_ht).sum()),
    }
}
