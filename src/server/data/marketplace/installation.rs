use chrono::Utc;
use entity::sea_orm_active_enums::InstallationStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct InstallationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InstallationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts an installation built by the caller, stamping both timestamps
    pub async fn create(
        &self,
        mut installation: entity::module_installation::ActiveModel,
    ) -> Result<entity::module_installation::Model, DbErr> {
        let now = Utc::now().naive_utc();
        installation.created_at = ActiveValue::Set(now);
        installation.updated_at = ActiveValue::Set(now);

        installation.insert(self.db).await
    }

    /// The installation record of a module for a societe, whatever its status
    pub async fn find(
        &self,
        societe_id: i32,
        module_id: i32,
    ) -> Result<Option<entity::module_installation::Model>, DbErr> {
        entity::prelude::ModuleInstallation::find()
            .filter(entity::module_installation::Column::SocieteId.eq(societe_id))
            .filter(entity::module_installation::Column::ModuleId.eq(module_id))
            .one(self.db)
            .await
    }

    /// Active `INSTALLED` installations of a societe, newest first
    pub async fn list_installed(
        &self,
        societe_id: i32,
    ) -> Result<Vec<entity::module_installation::Model>, DbErr> {
        entity::prelude::ModuleInstallation::find()
            .filter(entity::module_installation::Column::SocieteId.eq(societe_id))
            .filter(entity::module_installation::Column::Status.eq(InstallationStatus::Installed))
            .filter(entity::module_installation::Column::IsActive.eq(true))
            .order_by_desc(entity::module_installation::Column::InstalledAt)
            .order_by_desc(entity::module_installation::Column::Id)
            .all(self.db)
            .await
    }

    /// Counts installations of a module that are `INSTALLED` or `INSTALLING` in any societe
    pub async fn count_live_for_module(&self, module_id: i32) -> Result<u64, DbErr> {
        entity::prelude::ModuleInstallation::find()
            .filter(entity::module_installation::Column::ModuleId.eq(module_id))
            .filter(entity::module_installation::Column::Status.is_in([
                InstallationStatus::Installed,
                InstallationStatus::Installing,
            ]))
            .count(self.db)
            .await
    }

    /// Persists the changed fields of `installation` and stamps `updated_at`
    pub async fn update(
        &self,
        mut installation: entity::module_installation::ActiveModel,
    ) -> Result<entity::module_installation::Model, DbErr> {
        installation.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        installation.update(self.db).await
    }
}
