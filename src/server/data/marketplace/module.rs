use chrono::Utc;
use entity::{
    marketplace_module::StringList,
    sea_orm_active_enums::{ModuleCategory, ModuleStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::model::marketplace::CreateModuleDto;

pub struct ModuleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ModuleRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a module in `DRAFT` status
    pub async fn create(
        &self,
        module: CreateModuleDto,
        created_by: i32,
    ) -> Result<entity::marketplace_module::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let module = entity::marketplace_module::ActiveModel {
            module_key: ActiveValue::Set(module.module_key),
            display_name: ActiveValue::Set(module.display_name),
            description: ActiveValue::Set(module.description),
            short_description: ActiveValue::Set(module.short_description),
            category: ActiveValue::Set(module.category),
            publisher: ActiveValue::Set(module.publisher),
            version: ActiveValue::Set(module.version),
            status: ActiveValue::Set(ModuleStatus::Draft),
            pricing: ActiveValue::Set(module.pricing.into()),
            dependencies: ActiveValue::Set(StringList(module.dependencies)),
            permissions: ActiveValue::Set(StringList(module.permissions)),
            api_routes: ActiveValue::Set(StringList(module.api_routes)),
            menu_configuration: ActiveValue::Set(module.menu_configuration),
            icon: ActiveValue::Set(module.icon),
            download_count: ActiveValue::Set(0),
            rating_average: ActiveValue::Set(0.0),
            rating_count: ActiveValue::Set(0),
            is_active: ActiveValue::Set(true),
            created_by: ActiveValue::Set(Some(created_by)),
            updated_by: ActiveValue::Set(Some(created_by)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        module.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::marketplace_module::Model>, DbErr> {
        entity::prelude::MarketplaceModule::find_by_id(id)
            .one(self.db)
            .await
    }

    pub async fn find_by_key(
        &self,
        module_key: &str,
    ) -> Result<Option<entity::marketplace_module::Model>, DbErr> {
        entity::prelude::MarketplaceModule::find()
            .filter(entity::marketplace_module::Column::ModuleKey.eq(module_key))
            .one(self.db)
            .await
    }

    /// Modules with one of the given keys, in no particular order
    pub async fn find_by_keys(
        &self,
        module_keys: &[String],
    ) -> Result<Vec<entity::marketplace_module::Model>, DbErr> {
        if module_keys.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::MarketplaceModule::find()
            .filter(entity::marketplace_module::Column::ModuleKey.is_in(module_keys.iter().cloned()))
            .all(self.db)
            .await
    }

    pub async fn find_by_ids(
        &self,
        ids: &[i32],
    ) -> Result<Vec<entity::marketplace_module::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::MarketplaceModule::find()
            .filter(entity::marketplace_module::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Candidates for catalog listing, narrowed by the columns that can be filtered in SQL.
    ///
    /// Ordered by download count then rating average, both descending.
    pub async fn list(
        &self,
        status: ModuleStatus,
        category: Option<ModuleCategory>,
        publisher: Option<&str>,
    ) -> Result<Vec<entity::marketplace_module::Model>, DbErr> {
        let mut query = entity::prelude::MarketplaceModule::find()
            .filter(entity::marketplace_module::Column::Status.eq(status));

        if let Some(category) = category {
            query = query.filter(entity::marketplace_module::Column::Category.eq(category));
        }
        if let Some(publisher) = publisher {
            query = query.filter(entity::marketplace_module::Column::Publisher.eq(publisher));
        }

        query
            .order_by_desc(entity::marketplace_module::Column::DownloadCount)
            .order_by_desc(entity::marketplace_module::Column::RatingAverage)
            .order_by_asc(entity::marketplace_module::Column::Id)
            .all(self.db)
            .await
    }

    /// Persists the changed fields of `module` and stamps `updated_at`
    pub async fn update(
        &self,
        mut module: entity::marketplace_module::ActiveModel,
    ) -> Result<entity::marketplace_module::Model, DbErr> {
        module.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        module.update(self.db).await
    }

    /// Deletes a module
    ///
    /// Returns OK regardless of the module existing, check [`DeleteResult::rows_affected`].
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::MarketplaceModule::delete_by_id(id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::ModuleStatus;
    use sea_orm::{ActiveValue, IntoActiveModel};
    use topsteel_test_utils::prelude::*;

    use super::ModuleRepository;

    mod list {
        use super::*;

        /// Expect only modules in the status, most downloaded first
        #[tokio::test]
        async fn orders_by_downloads() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::MarketplaceModule)?;
            test.marketplace().insert_published_module("stock").await?;
            let popular = test.marketplace().insert_published_module("planning").await?;
            test.marketplace()
                .insert_module("brouillon", ModuleStatus::Draft, Vec::new())
                .await?;
            let repo = ModuleRepository::new(&test.state.db);
            let mut popular = popular.into_active_model();
            popular.download_count = ActiveValue::Set(42);
            repo.update(popular).await?;

            let modules = repo.list(ModuleStatus::Published, None, None).await?;

            let keys: Vec<_> = modules.iter().map(|m| m.module_key.as_str()).collect();
            assert_eq!(keys, vec!["planning", "stock"]);

            Ok(())
        }
    }

    mod find_by_keys {
        use super::*;

        #[tokio::test]
        async fn returns_existing_keys_only() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::MarketplaceModule)?;
            test.marketplace().insert_published_module("stock").await?;
            let repo = ModuleRepository::new(&test.state.db);

            let found = repo
                .find_by_keys(&["stock".to_string(), "absent".to_string()])
                .await?;

            assert_eq!(found.len(), 1);
            assert!(repo.find_by_keys(&[]).await?.is_empty());

            Ok(())
        }
    }
}
