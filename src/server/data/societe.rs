use chrono::Utc;
use entity::sea_orm_active_enums::SocieteStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct SocieteRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SocieteRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a societe in `PENDING` status
    pub async fn create(
        &self,
        code: &str,
        nom: &str,
        database_name: &str,
        max_users: i32,
    ) -> Result<entity::societe::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let societe = entity::societe::ActiveModel {
            code: ActiveValue::Set(code.to_string()),
            nom: ActiveValue::Set(nom.to_string()),
            status: ActiveValue::Set(SocieteStatus::Pending),
            database_name: ActiveValue::Set(database_name.to_string()),
            max_users: ActiveValue::Set(max_users),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        societe.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::societe::Model>, DbErr> {
        entity::prelude::Societe::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<entity::societe::Model>, DbErr> {
        entity::prelude::Societe::find()
            .filter(entity::societe::Column::Code.eq(code))
            .one(self.db)
            .await
    }

    pub async fn list(&self) -> Result<Vec<entity::societe::Model>, DbErr> {
        entity::prelude::Societe::find()
            .order_by_asc(entity::societe::Column::Code)
            .all(self.db)
            .await
    }

    /// Returns `None` when the societe does not exist
    pub async fn update_status(
        &self,
        id: i32,
        status: SocieteStatus,
    ) -> Result<Option<entity::societe::Model>, DbErr> {
        let Some(societe) = self.get(id).await? else {
            return Ok(None);
        };

        let mut societe: entity::societe::ActiveModel = societe.into();
        societe.status = ActiveValue::Set(status);
        societe.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(societe.update(self.db).await?))
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::SocieteStatus;
    use topsteel_test_utils::prelude::*;

    use super::SocieteRepository;

    mod create {
        use super::*;

        /// Expect a new societe to start in PENDING status
        #[tokio::test]
        async fn creates_pending_societe() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Societe)?;
            let repo = SocieteRepository::new(&test.state.db);

            let societe = repo.create("ACME", "Acme Metal", "erp_tenant_acme", 25).await?;

            assert_eq!(societe.code, "ACME");
            assert_eq!(societe.status, SocieteStatus::Pending);
            assert_eq!(societe.max_users, 25);

            Ok(())
        }

        /// Expect Error when the societe table is missing
        #[tokio::test]
        async fn fails_without_table() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;
            let repo = SocieteRepository::new(&test.state.db);

            let result = repo.create("ACME", "Acme Metal", "erp_tenant_acme", 25).await;

            assert!(result.is_err());

            Ok(())
        }
    }

    mod find_by_code {
        use super::*;

        /// Expect the societe matching the code, None otherwise
        #[tokio::test]
        async fn finds_existing_code() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Societe)?;
            let inserted = test.societe().insert_active_societe().await?;
            let repo = SocieteRepository::new(&test.state.db);

            let found = repo.find_by_code(TEST_SOCIETE_CODE).await?;
            let missing = repo.find_by_code("OTHER").await?;

            assert_eq!(found.map(|s| s.id), Some(inserted.id));
            assert!(missing.is_none());

            Ok(())
        }
    }

    mod update_status {
        use super::*;

        /// Expect the status to change and None for unknown ids
        #[tokio::test]
        async fn updates_status() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Societe)?;
            let inserted = test.societe().insert_active_societe().await?;
            let repo = SocieteRepository::new(&test.state.db);

            let updated = repo
                .update_status(inserted.id, SocieteStatus::Suspended)
                .await?;
            let missing = repo.update_status(999, SocieteStatus::Active).await?;

            assert_eq!(updated.map(|s| s.status), Some(SocieteStatus::Suspended));
            assert!(missing.is_none());

            Ok(())
        }
    }
}
