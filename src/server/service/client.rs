use entity::sea_orm_active_enums::{ClientStatus, ClientType};
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    model::{
        api::{FieldError, PageDto},
        client::{ClientDto, ClientFilter, ClientStatsDto, CreateClientDto, UpdateClientDto},
    },
    server::{
        data::{client::ClientRepository, projet::ProjetRepository},
        error::{business::BusinessError, Error},
        util::reference::client_code,
    },
};

const SIRET_LEN: usize = 14;

pub struct ClientService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClientService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &ClientFilter) -> Result<PageDto<ClientDto>, Error> {
        let pagination = filter.pagination();
        let (clients, total) = ClientRepository::new(self.db).list(filter).await?;

        Ok(PageDto {
            items: clients.into_iter().map(ClientDto::from).collect(),
            total,
            page: pagination.page(),
            limit: pagination.limit(),
        })
    }

    pub async fn get(&self, id: i32) -> Result<ClientDto, Error> {
        Ok(self.find(id).await?.into())
    }

    /// Creates a client, generating its code from the type sequence when none is given
    ///
    /// Clients default to type `CLIENT` and status `PROSPECT`.
    pub async fn create(&self, client: CreateClientDto) -> Result<ClientDto, Error> {
        let repo = ClientRepository::new(self.db);

        let mut errors = validate_fields(
            Some(&client.denomination),
            client.email.as_deref(),
            client.siret.as_deref(),
            client.taux_remise,
            client.plafond_credit,
        );
        if let Some(code) = client.code.as_deref() {
            if code.trim().is_empty() {
                errors.push(FieldError::new("code", "must not be empty"));
            }
        }
        BusinessError::check(errors)?;

        let client_type = client.client_type.unwrap_or(ClientType::Client);
        let status = client.status.unwrap_or(ClientStatus::Prospect);

        let code = match client.code.as_deref().map(str::trim) {
            Some(code) => {
                if repo.find_by_code(code).await?.is_some() {
                    return Err(
                        BusinessError::Conflict(format!("Client code {} already exists", code))
                            .into(),
                    );
                }
                code.to_string()
            }
            None => self.next_code(client_type).await?,
        };

        let created = repo.create(code, client_type, status, client).await?;
        tracing::info!(client_id = %created.id, code = %created.code, "Client created");

        Ok(created.into())
    }

    /// Applies the provided fields; `code` and `client_type` cannot change
    pub async fn update(&self, id: i32, changes: UpdateClientDto) -> Result<ClientDto, Error> {
        let existing = self.find(id).await?;

        let mut errors = validate_fields(
            changes.denomination.as_deref(),
            changes.email.as_deref(),
            changes.siret.as_deref(),
            changes.taux_remise,
            changes.plafond_credit,
        );
        if changes.code.as_ref().is_some_and(|code| *code != existing.code) {
            errors.push(FieldError::new("code", "cannot be changed"));
        }
        if changes.client_type.is_some_and(|t| t != existing.client_type) {
            errors.push(FieldError::new("client_type", "cannot be changed"));
        }
        BusinessError::check(errors)?;

        let mut client: entity::client::ActiveModel = existing.into();
        if let Some(status) = changes.status {
            client.status = ActiveValue::Set(status);
        }
        if let Some(denomination) = changes.denomination {
            client.denomination = ActiveValue::Set(denomination.trim().to_string());
        }
        set_some(&mut client.siret, changes.siret);
        set_some(&mut client.numero_tva, changes.numero_tva);
        set_some(&mut client.contact_principal, changes.contact_principal);
        set_some(&mut client.email, changes.email);
        set_some(&mut client.telephone, changes.telephone);
        set_some(&mut client.adresse, changes.adresse);
        set_some(&mut client.code_postal, changes.code_postal);
        set_some(&mut client.ville, changes.ville);
        if let Some(pays) = changes.pays {
            client.pays = ActiveValue::Set(pays);
        }
        set_some(&mut client.plafond_credit, changes.plafond_credit);
        set_some(&mut client.taux_remise, changes.taux_remise);
        set_some(&mut client.notes, changes.notes);

        Ok(ClientRepository::new(self.db).update(client).await?.into())
    }

    /// Deletes a client that no projet references
    pub async fn delete(&self, id: i32) -> Result<(), Error> {
        let client = self.find(id).await?;

        let projets = ProjetRepository::new(self.db).count_by_client(id).await?;
        if projets > 0 {
            return Err(BusinessError::Conflict(format!(
                "Client {} is referenced by {} projet(s)",
                client.code, projets
            ))
            .into());
        }

        ClientRepository::new(self.db).delete(id).await?;
        tracing::info!(client_id = %id, "Client deleted");

        Ok(())
    }

    /// Turns a `PROSPECT` into an `ACTIF` client
    pub async fn convert_prospect(&self, id: i32) -> Result<ClientDto, Error> {
        let client = self.find(id).await?;
        if client.status != ClientStatus::Prospect {
            return Err(BusinessError::InvalidState(format!(
                "Client {} is not a prospect",
                client.code
            ))
            .into());
        }

        let mut client: entity::client::ActiveModel = client.into();
        client.status = ActiveValue::Set(ClientStatus::Actif);

        Ok(ClientRepository::new(self.db).update(client).await?.into())
    }

    pub async fn suspend(&self, id: i32, reason: &str) -> Result<ClientDto, Error> {
        if reason.trim().is_empty() {
            return Err(
                BusinessError::Validation(vec![FieldError::new("reason", "must not be empty")])
                    .into(),
            );
        }

        let client = self.find(id).await?;
        let mut client: entity::client::ActiveModel = client.into();
        client.status = ActiveValue::Set(ClientStatus::Suspendu);
        client.suspension_reason = ActiveValue::Set(Some(reason.trim().to_string()));

        let client = ClientRepository::new(self.db).update(client).await?;
        tracing::info!(client_id = %id, "Client suspended");

        Ok(client.into())
    }

    pub async fn stats(&self) -> Result<ClientStatsDto, Error> {
        let counts = ClientRepository::new(self.db)
            .count_by_type_and_status()
            .await?;

        let mut stats = ClientStatsDto::default();
        for (client_type, status, count) in counts {
            let count = count.max(0) as u64;
            stats.total += count;

            match client_type {
                ClientType::Client => stats.clients += count,
                ClientType::Fournisseur => stats.fournisseurs += count,
                ClientType::Mixte => stats.mixtes += count,
            }
            match status {
                ClientStatus::Prospect => stats.prospects += count,
                ClientStatus::Actif => stats.actifs += count,
                ClientStatus::Inactif => stats.inactifs += count,
                ClientStatus::Suspendu => stats.suspendus += count,
            }
        }

        Ok(stats)
    }

    async fn find(&self, id: i32) -> Result<entity::client::Model, Error> {
        ClientRepository::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Client", id).into())
    }

    /// First free code after the number of existing clients of that type
    async fn next_code(&self, client_type: ClientType) -> Result<String, Error> {
        let repo = ClientRepository::new(self.db);
        let mut sequence = repo.count_by_type(client_type).await? + 1;

        loop {
            let code = client_code(client_type, sequence);
            if repo.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
            sequence += 1;
        }
    }
}

/// Overwrites a nullable column only when a new value is provided
fn set_some<T>(field: &mut ActiveValue<Option<T>>, value: Option<T>)
where
    Option<T>: Into<sea_orm::Value>,
{
    if value.is_some() {
        *field = ActiveValue::Set(value);
    }
}

/// Field checks shared by create and update; `None` means the field is not provided
fn validate_fields(
    denomination: Option<&str>,
    email: Option<&str>,
    siret: Option<&str>,
    taux_remise: Option<f64>,
    plafond_credit: Option<f64>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if denomination.is_some_and(|d| d.trim().is_empty()) {
        errors.push(FieldError::new("denomination", "must not be empty"));
    }
    if email.is_some_and(|e| !e.contains('@')) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
    if siret.is_some_and(|s| s.len() != SIRET_LEN || !s.bytes().all(|b| b.is_ascii_digit())) {
        errors.push(FieldError::new("siret", "must contain exactly 14 digits"));
    }
    if taux_remise.is_some_and(|t| !(0.0..=100.0).contains(&t)) {
        errors.push(FieldError::new("taux_remise", "must be between 0 and 100"));
    }
    if plafond_credit.is_some_and(|p| p < 0.0) {
        errors.push(FieldError::new("plafond_credit", "must not be negative"));
    }

    errors
}
