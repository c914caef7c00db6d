use chrono::Utc;
use sea_orm::{
    sea_query::ExprTrait,
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::model::projet::ProjetFilter;

pub struct ProjetRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProjetRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a projet built by the caller, stamping both timestamps
    pub async fn create(
        &self,
        mut projet: entity::projet::ActiveModel,
    ) -> Result<entity::projet::Model, DbErr> {
        let now = Utc::now().naive_utc();
        projet.created_at = ActiveValue::Set(now);
        projet.updated_at = ActiveValue::Set(now);

        projet.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::projet::Model>, DbErr> {
        entity::prelude::Projet::find_by_id(id).one(self.db).await
    }

    pub async fn reference_exists(&self, reference: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Projet::find()
            .filter(entity::projet::Column::Reference.eq(reference))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Counts projets whose reference belongs to `year`
    pub async fn count_for_year(&self, year: i32) -> Result<u64, DbErr> {
        entity::prelude::Projet::find()
            .filter(entity::projet::Column::Reference.starts_with(format!("PRJ-{}-", year)))
            .count(self.db)
            .await
    }

    pub async fn count_by_client(&self, client_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Projet::find()
            .filter(entity::projet::Column::ClientId.eq(client_id))
            .count(self.db)
            .await
    }

    /// Returns one page of projets matching the filter, newest first, and the total
    /// number of matches.
    pub async fn list(
        &self,
        filter: &ProjetFilter,
    ) -> Result<(Vec<entity::projet::Model>, u64), DbErr> {
        let mut query = entity::prelude::Projet::find();

        if let Some(statut) = filter.statut {
            query = query.filter(entity::projet::Column::Statut.eq(statut));
        }
        if let Some(priorite) = filter.priorite {
            query = query.filter(entity::projet::Column::Priorite.eq(priorite));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(entity::projet::Column::ClientId.eq(client_id));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let search = search.trim();
            query = query.filter(
                entity::projet::Column::Reference
                    .contains(search)
                    .or(entity::projet::Column::Description.contains(search)),
            );
        }

        let pagination = filter.pagination();
        let paginator = query
            .order_by_desc(entity::projet::Column::CreatedAt)
            .order_by_desc(entity::projet::Column::Id)
            .paginate(self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let projets = paginator.fetch_page(pagination.page()).await?;

        Ok((projets, total))
    }

    pub async fn all(&self) -> Result<Vec<entity::projet::Model>, DbErr> {
        entity::prelude::Projet::find().all(self.db).await
    }

    /// Persists the changed fields of `projet` and stamps `updated_at`
    pub async fn update(
        &self,
        mut projet: entity::projet::ActiveModel,
    ) -> Result<entity::projet::Model, DbErr> {
        projet.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        projet.update(self.db).await
    }

    /// Deletes a projet
    ///
    /// Returns OK regardless of the projet existing, check [`DeleteResult::rows_affected`].
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Projet::delete_by_id(id).exec(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::ProjetStatut;
    use topsteel_test_utils::prelude::*;

    use super::ProjetRepository;
    use crate::model::projet::ProjetFilter;

    mod list {
        use super::*;

        /// Expect only projets in the requested status
        #[tokio::test]
        async fn filters_by_statut() -> Result<(), TestError> {
            let test = test_setup_with_tenant_tables!(
                entity::prelude::Client,
                entity::prelude::Projet
            )?;
            let client = test.tenant().insert_active_client("CLI000001").await?;
            test.tenant()
                .insert_projet("PRJ-2025-0001", client.id, ProjetStatut::EnCours, None)
                .await?;
            test.tenant()
                .insert_projet("PRJ-2025-0002", client.id, ProjetStatut::Devis, None)
                .await?;
            test.tenant()
                .insert_projet("PRJ-2025-0003", client.id, ProjetStatut::EnCours, None)
                .await?;
            let repo = ProjetRepository::new(&test.state.tenant_db);

            let (projets, total) = repo
                .list(&ProjetFilter {
                    statut: Some(ProjetStatut::EnCours),
                    ..Default::default()
                })
                .await?;

            assert_eq!(total, 2);
            assert!(projets.iter().all(|p| p.statut == ProjetStatut::EnCours));
            assert_eq!(projets[0].reference, "PRJ-2025-0003");

            Ok(())
        }

        /// Expect Error when the projet table is missing
        #[tokio::test]
        async fn fails_without_table() -> Result<(), TestError> {
            let test = test_setup_with_tenant_tables!(entity::prelude::Client)?;
            let repo = ProjetRepository::new(&test.state.tenant_db);

            let result = repo.list(&ProjetFilter::default()).await;

            assert!(result.is_err());

            Ok(())
        }
    }

    mod count_for_year {
        use super::*;

        #[tokio::test]
        async fn counts_only_matching_year() -> Result<(), TestError> {
            let test = test_setup_with_tenant_tables!(
                entity::prelude::Client,
                entity::prelude::Projet
            )?;
            let client = test.tenant().insert_active_client("CLI000001").await?;
            test.tenant()
                .insert_projet("PRJ-2024-0001", client.id, ProjetStatut::Termine, None)
                .await?;
            test.tenant()
                .insert_projet("PRJ-2025-0001", client.id, ProjetStatut::Devis, None)
                .await?;
            let repo = ProjetRepository::new(&test.state.tenant_db);

            assert_eq!(repo.count_for_year(2025).await?, 1);
            assert_eq!(repo.count_by_client(client.id).await?, 2);

            Ok(())
        }
    }
}
