use chrono::Utc;
use entity::sea_orm_active_enums::{ClientStatus, ClientType};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::client::{ClientFilter, CreateClientDto};

pub struct ClientRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ClientRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        code: String,
        client_type: ClientType,
        status: ClientStatus,
        client: CreateClientDto,
    ) -> Result<entity::client::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let client = entity::client::ActiveModel {
            code: ActiveValue::Set(code),
            client_type: ActiveValue::Set(client_type),
            status: ActiveValue::Set(status),
            denomination: ActiveValue::Set(client.denomination.trim().to_string()),
            siret: ActiveValue::Set(client.siret),
            numero_tva: ActiveValue::Set(client.numero_tva),
            contact_principal: ActiveValue::Set(client.contact_principal),
            email: ActiveValue::Set(client.email),
            telephone: ActiveValue::Set(client.telephone),
            adresse: ActiveValue::Set(client.adresse),
            code_postal: ActiveValue::Set(client.code_postal),
            ville: ActiveValue::Set(client.ville),
            pays: ActiveValue::Set(client.pays.unwrap_or_else(|| "France".to_string())),
            plafond_credit: ActiveValue::Set(client.plafond_credit),
            taux_remise: ActiveValue::Set(client.taux_remise),
            notes: ActiveValue::Set(client.notes),
            suspension_reason: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        client.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::client::Model>, DbErr> {
        entity::prelude::Client::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<entity::client::Model>, DbErr> {
        entity::prelude::Client::find()
            .filter(entity::client::Column::Code.eq(code))
            .one(self.db)
            .await
    }

    /// Returns one page of clients matching the filter, ordered by denomination, and the
    /// total number of matches.
    pub async fn list(
        &self,
        filter: &ClientFilter,
    ) -> Result<(Vec<entity::client::Model>, u64), DbErr> {
        let mut query = entity::prelude::Client::find();

        if let Some(client_type) = filter.client_type {
            query = query.filter(entity::client::Column::ClientType.eq(client_type));
        }
        if let Some(status) = filter.status {
            query = query.filter(entity::client::Column::Status.eq(status));
        }
        if let Some(ville) = filter.ville.as_deref() {
            query = query.filter(entity::client::Column::Ville.eq(ville));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(entity::client::Column::Denomination.contains(search.trim()));
        }

        let pagination = filter.pagination();
        let paginator = query
            .order_by_asc(entity::client::Column::Denomination)
            .order_by_asc(entity::client::Column::Id)
            .paginate(self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let clients = paginator.fetch_page(pagination.page()).await?;

        Ok((clients, total))
    }

    pub async fn count_by_type(&self, client_type: ClientType) -> Result<u64, DbErr> {
        entity::prelude::Client::find()
            .filter(entity::client::Column::ClientType.eq(client_type))
            .count(self.db)
            .await
    }

    /// Counts clients grouped by `(client_type, status)`
    pub async fn count_by_type_and_status(
        &self,
    ) -> Result<Vec<(ClientType, ClientStatus, i64)>, DbErr> {
        entity::prelude::Client::find()
            .select_only()
            .column(entity::client::Column::ClientType)
            .column(entity::client::Column::Status)
            .column_as(entity::client::Column::Id.count(), "count")
            .group_by(entity::client::Column::ClientType)
            .group_by(entity::client::Column::Status)
            .into_tuple::<(ClientType, ClientStatus, i64)>()
            .all(self.db)
            .await
    }

    /// Persists the changed fields of `client` and stamps `updated_at`
    pub async fn update(
        &self,
        mut client: entity::client::ActiveModel,
    ) -> Result<entity::client::Model, DbErr> {
        client.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        client.update(self.db).await
    }

    /// Deletes a client
    ///
    /// Returns OK regardless of the client existing, check [`DeleteResult::rows_affected`].
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Client::delete_by_id(id).exec(self.db).await
    }
}
