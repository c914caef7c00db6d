use std::collections::{HashMap, HashSet};

use chrono::Utc;
use entity::{
    marketplace_module::StringList,
    module_installation::{InstallationLogEntry, InstallationLogs},
    sea_orm_active_enums::{InstallationStatus, ModuleStatus},
};
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel, TransactionTrait};

use crate::{
    model::{
        api::FieldError,
        marketplace::{
            CreateModuleDto, InstallModuleDto, InstallationDto, InstallationResultDto,
            InstalledModuleDto, ModuleDto, ModuleFilter, PricingDto, RateModuleDto, RatingDto,
            UpdateModuleDto,
        },
    },
    server::{
        data::marketplace::{
            installation::InstallationRepository, module::ModuleRepository,
            rating::RatingRepository,
        },
        error::{business::BusinessError, Error},
        util::math::round2,
    },
};

const DEFAULT_RATINGS_LIMIT: u64 = 10;
const MAX_RATINGS_LIMIT: u64 = 100;
const PRICING_TYPES: [&str; 3] = ["FREE", "ONE_TIME", "SUBSCRIPTION"];

/// Average after adding a first rating from a user
pub fn add_rating(average: f64, count: i32, rating: i32) -> f64 {
    round2((average * count as f64 + rating as f64) / (count + 1) as f64)
}

/// Average after a user replaced `old` by `new`
pub fn replace_rating(average: f64, count: i32, old: i32, new: i32) -> f64 {
    if count <= 0 {
        return new as f64;
    }

    round2((average * count as f64 - old as f64 + new as f64) / count as f64)
}

/// Whether a module passes the filters that are not applied in SQL
fn matches(module: &entity::marketplace_module::Model, filter: &ModuleFilter) -> bool {
    if let Some(min_rating) = filter.min_rating {
        if module.rating_average < min_rating {
            return false;
        }
    }
    if let Some(is_free) = filter.is_free {
        if module.pricing.is_free() != is_free {
            return false;
        }
    }

    let price = module.pricing.amount.unwrap_or(0.0);
    if filter.min_price.is_some_and(|min| price < min) {
        return false;
    }
    if filter.max_price.is_some_and(|max| price > max) {
        return false;
    }

    match filter.query.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => {
            let query = query.to_lowercase();
            [
                Some(module.display_name.as_str()),
                Some(module.description.as_str()),
                module.short_description.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&query))
        }
        _ => true,
    }
}

fn validate_pricing(pricing: &PricingDto, errors: &mut Vec<FieldError>) {
    if !PRICING_TYPES.contains(&pricing.pricing_type.as_str()) {
        errors.push(FieldError::new(
            "pricing.type",
            "must be FREE, ONE_TIME or SUBSCRIPTION",
        ));
    }
    if pricing.amount.is_some_and(|amount| amount < 0.0) {
        errors.push(FieldError::new("pricing.amount", "must not be negative"));
    }
}

fn log_entry(level: &str, message: impl Into<String>) -> InstallationLogEntry {
    InstallationLogEntry {
        level: level.to_string(),
        message: message.into(),
        at: Utc::now().naive_utc(),
    }
}

pub struct MarketplaceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MarketplaceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Catalog listing, `PUBLISHED` modules unless another status is requested
    pub async fn list(&self, filter: &ModuleFilter) -> Result<Vec<ModuleDto>, Error> {
        let modules = ModuleRepository::new(self.db)
            .list(
                filter.status.unwrap_or(ModuleStatus::Published),
                filter.category,
                filter.publisher.as_deref(),
            )
            .await?;

        Ok(modules
            .into_iter()
            .filter(|module| matches(module, filter))
            .map(ModuleDto::from)
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<ModuleDto, Error> {
        Ok(self.find(id).await?.into())
    }

    pub async fn get_by_key(&self, module_key: &str) -> Result<ModuleDto, Error> {
        ModuleRepository::new(self.db)
            .find_by_key(module_key)
            .await?
            .map(ModuleDto::from)
            .ok_or_else(|| BusinessError::not_found("Module", module_key).into())
    }

    pub async fn create(&self, module: CreateModuleDto, user_id: i32) -> Result<ModuleDto, Error> {
        let repo = ModuleRepository::new(self.db);

        let mut errors = Vec::new();
        if module.module_key.trim().is_empty() {
            errors.push(FieldError::new("module_key", "must not be empty"));
        }
        if module.display_name.trim().is_empty() {
            errors.push(FieldError::new("display_name", "must not be empty"));
        }
        if module.version.trim().is_empty() {
            errors.push(FieldError::new("version", "must not be empty"));
        }
        validate_pricing(&module.pricing, &mut errors);
        BusinessError::check(errors)?;

        if repo.find_by_key(&module.module_key).await?.is_some() {
            return Err(BusinessError::Conflict(format!(
                "Module {} already exists",
                module.module_key
            ))
            .into());
        }

        let created = repo.create(module, user_id).await?;
        tracing::info!(module_id = %created.id, module_key = %created.module_key, "Marketplace module created");

        Ok(created.into())
    }

    pub async fn update(
        &self,
        id: i32,
        changes: UpdateModuleDto,
        user_id: i32,
    ) -> Result<ModuleDto, Error> {
        let module = self.find(id).await?;

        let mut errors = Vec::new();
        if changes
            .display_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            errors.push(FieldError::new("display_name", "must not be empty"));
        }
        if changes
            .version
            .as_deref()
            .is_some_and(|version| version.trim().is_empty())
        {
            errors.push(FieldError::new("version", "must not be empty"));
        }
        if let Some(pricing) = &changes.pricing {
            validate_pricing(pricing, &mut errors);
        }
        BusinessError::check(errors)?;

        let mut module = module.into_active_model();
        if let Some(display_name) = changes.display_name {
            module.display_name = ActiveValue::Set(display_name);
        }
        if let Some(description) = changes.description {
            module.description = ActiveValue::Set(description);
        }
        if let Some(short_description) = changes.short_description {
            module.short_description = ActiveValue::Set(Some(short_description));
        }
        if let Some(category) = changes.category {
            module.category = ActiveValue::Set(category);
        }
        if let Some(version) = changes.version {
            module.version = ActiveValue::Set(version);
        }
        if let Some(pricing) = changes.pricing {
            module.pricing = ActiveValue::Set(pricing.into());
        }
        if let Some(dependencies) = changes.dependencies {
            module.dependencies = ActiveValue::Set(StringList(dependencies));
        }
        if let Some(permissions) = changes.permissions {
            module.permissions = ActiveValue::Set(StringList(permissions));
        }
        if let Some(api_routes) = changes.api_routes {
            module.api_routes = ActiveValue::Set(StringList(api_routes));
        }
        if let Some(menu_configuration) = changes.menu_configuration {
            module.menu_configuration = ActiveValue::Set(Some(menu_configuration));
        }
        if let Some(icon) = changes.icon {
            module.icon = ActiveValue::Set(Some(icon));
        }
        if let Some(is_active) = changes.is_active {
            module.is_active = ActiveValue::Set(is_active);
        }
        module.updated_by = ActiveValue::Set(Some(user_id));

        let updated = ModuleRepository::new(self.db).update(module).await?;
        tracing::info!(module_id = %id, "Marketplace module updated");

        Ok(updated.into())
    }

    /// Deletes a module nobody has installed or is installing
    pub async fn delete(&self, id: i32) -> Result<(), Error> {
        let module = self.find(id).await?;

        let live = InstallationRepository::new(self.db)
            .count_live_for_module(id)
            .await?;
        if live > 0 {
            return Err(BusinessError::Forbidden(format!(
                "Module {} is installed by {} societe(s)",
                module.module_key, live
            ))
            .into());
        }

        ModuleRepository::new(self.db).delete(id).await?;
        tracing::info!(module_id = %id, "Marketplace module deleted");

        Ok(())
    }

    pub async fn publish(&self, id: i32) -> Result<ModuleDto, Error> {
        let module = self.find(id).await?;
        if module.status != ModuleStatus::Draft {
            return Err(BusinessError::InvalidState(format!(
                "Only draft modules can be published, module {} is {:?}",
                module.module_key, module.status
            ))
            .into());
        }

        self.set_status(module, ModuleStatus::Published).await
    }

    pub async fn unpublish(&self, id: i32) -> Result<ModuleDto, Error> {
        let module = self.find(id).await?;

        self.set_status(module, ModuleStatus::Disabled).await
    }

    /// Installs a module for a societe.
    ///
    /// Refusals (unavailable module, already installed, missing dependencies) are reported in
    /// the result with `success: false` rather than as errors. A `FAILED` or `UNINSTALLED`
    /// installation record is reused.
    pub async fn install(
        &self,
        societe_id: i32,
        module_id: i32,
        request: InstallModuleDto,
        user_id: i32,
    ) -> Result<InstallationResultDto, Error> {
        let txn = self.db.begin().await?;
        let modules = ModuleRepository::new(&txn);
        let installations = InstallationRepository::new(&txn);

        let module = modules
            .get(module_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Module", module_id))?;

        if module.status != ModuleStatus::Published || !module.is_active {
            return Ok(InstallationResultDto {
                errors: Some(vec!["Module unavailable".to_string()]),
                ..InstallationResultDto::failed(
                    module_id,
                    "Module cannot be installed (not published or inactive)",
                )
            });
        }

        let existing = installations.find(societe_id, module_id).await?;
        match existing.as_ref().map(|installation| installation.status) {
            Some(InstallationStatus::Installed) => {
                return Ok(InstallationResultDto {
                    errors: Some(vec!["Module already installed".to_string()]),
                    ..InstallationResultDto::failed(module_id, "Module is already installed")
                });
            }
            Some(
                InstallationStatus::Pending
                | InstallationStatus::Installing
                | InstallationStatus::Uninstalling,
            ) => {
                return Ok(InstallationResultDto::failed(
                    module_id,
                    "An operation is already in progress for this module",
                ));
            }
            Some(InstallationStatus::Failed | InstallationStatus::Uninstalled) | None => {}
        }

        let installed_ids: Vec<i32> = installations
            .list_installed(societe_id)
            .await?
            .into_iter()
            .map(|installation| installation.module_id)
            .collect();
        let installed_keys: HashSet<String> = modules
            .find_by_ids(&installed_ids)
            .await?
            .into_iter()
            .map(|installed| installed.module_key)
            .collect();
        let missing: Vec<String> = module
            .dependencies
            .0
            .iter()
            .filter(|key| !installed_keys.contains(*key))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Ok(InstallationResultDto {
                errors: Some(missing),
                ..InstallationResultDto::failed(module_id, "Unsatisfied dependencies")
            });
        }

        let mut logs = existing
            .as_ref()
            .map(|installation| installation.logs.0.clone())
            .unwrap_or_default();
        logs.push(log_entry(
            "INFO",
            format!("Installing version {}", module.version),
        ));
        if !module.permissions.0.is_empty() {
            logs.push(log_entry("INFO", "Creating module permissions"));
        }
        if module.menu_configuration.is_some() {
            logs.push(log_entry("INFO", "Integrating menu configuration"));
        }
        if !module.api_routes.0.is_empty() {
            logs.push(log_entry("INFO", "Registering API routes"));
        }
        logs.push(log_entry("INFO", "Installation completed"));

        let now = Utc::now().naive_utc();
        let fields = entity::module_installation::ActiveModel {
            installed_version: ActiveValue::Set(module.version.clone()),
            status: ActiveValue::Set(InstallationStatus::Installed),
            configuration: ActiveValue::Set(request.configuration),
            installed_by: ActiveValue::Set(Some(user_id)),
            installed_at: ActiveValue::Set(Some(now)),
            uninstalled_by: ActiveValue::Set(None),
            uninstalled_at: ActiveValue::Set(None),
            failure_reason: ActiveValue::Set(None),
            logs: ActiveValue::Set(InstallationLogs(logs)),
            is_active: ActiveValue::Set(true),
            ..Default::default()
        };

        let installation = match existing {
            Some(existing) => {
                installations
                    .update(entity::module_installation::ActiveModel {
                        id: ActiveValue::Unchanged(existing.id),
                        ..fields
                    })
                    .await?
            }
            None => {
                installations
                    .create(entity::module_installation::ActiveModel {
                        societe_id: ActiveValue::Set(societe_id),
                        module_id: ActiveValue::Set(module_id),
                        ..fields
                    })
                    .await?
            }
        };

        let download_count = module.download_count + 1;
        let mut module = module.into_active_model();
        module.download_count = ActiveValue::Set(download_count);
        modules.update(module).await?;

        txn.commit().await?;
        tracing::info!(
            societe_id = %societe_id,
            module_id = %module_id,
            installation_id = %installation.id,
            "Marketplace module installed"
        );

        Ok(InstallationResultDto {
            success: true,
            installation_id: Some(installation.id),
            module_id,
            message: "Module installed".to_string(),
            errors: None,
        })
    }

    /// Uninstalls an `INSTALLED` module, reporting `success: false` otherwise
    pub async fn uninstall(
        &self,
        societe_id: i32,
        module_id: i32,
        user_id: i32,
    ) -> Result<InstallationResultDto, Error> {
        self.find(module_id).await?;

        let repo = InstallationRepository::new(self.db);
        let Some(installation) = repo
            .find(societe_id, module_id)
            .await?
            .filter(|installation| installation.status == InstallationStatus::Installed)
        else {
            return Ok(InstallationResultDto::failed(
                module_id,
                "Module is not installed",
            ));
        };

        let mut logs = installation.logs.0.clone();
        logs.push(log_entry("INFO", "Removing menu configuration"));
        logs.push(log_entry("INFO", "Cleaning API routes"));
        logs.push(log_entry("INFO", "Cleaning permissions"));
        logs.push(log_entry("INFO", "Uninstallation completed"));

        let installation_id = installation.id;
        let mut installation = installation.into_active_model();
        installation.status = ActiveValue::Set(InstallationStatus::Uninstalled);
        installation.uninstalled_by = ActiveValue::Set(Some(user_id));
        installation.uninstalled_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
        installation.is_active = ActiveValue::Set(false);
        installation.logs = ActiveValue::Set(InstallationLogs(logs));
        repo.update(installation).await?;

        tracing::info!(
            societe_id = %societe_id,
            module_id = %module_id,
            "Marketplace module uninstalled"
        );

        Ok(InstallationResultDto {
            success: true,
            installation_id: Some(installation_id),
            module_id,
            message: "Module uninstalled".to_string(),
            errors: None,
        })
    }

    /// Modules installed for a societe with their catalog entry, newest installation first
    pub async fn installed(&self, societe_id: i32) -> Result<Vec<InstalledModuleDto>, Error> {
        let installations = InstallationRepository::new(self.db)
            .list_installed(societe_id)
            .await?;
        let module_ids: Vec<i32> = installations.iter().map(|i| i.module_id).collect();
        let mut modules: HashMap<i32, entity::marketplace_module::Model> =
            ModuleRepository::new(self.db)
                .find_by_ids(&module_ids)
                .await?
                .into_iter()
                .map(|module| (module.id, module))
                .collect();

        Ok(installations
            .into_iter()
            .filter_map(|installation| {
                let module = modules.remove(&installation.module_id)?;
                Some(InstalledModuleDto {
                    installation: InstallationDto::from(installation),
                    module: module.into(),
                })
            })
            .collect())
    }

    /// Records the rating of a user, replacing their previous one
    pub async fn rate(
        &self,
        module_id: i32,
        user_id: i32,
        rating: RateModuleDto,
    ) -> Result<RatingDto, Error> {
        if !(1..=5).contains(&rating.rating) {
            return Err(BusinessError::Validation(vec![FieldError::new(
                "rating",
                "must be between 1 and 5",
            )])
            .into());
        }

        let txn = self.db.begin().await?;
        let modules = ModuleRepository::new(&txn);
        let ratings = RatingRepository::new(&txn);

        let module = modules
            .get(module_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Module", module_id))?;

        let (saved, average, count) = match ratings.find(module_id, user_id).await? {
            Some(previous) => {
                let old = previous.rating;
                let saved = ratings
                    .update(previous, rating.rating, rating.comment, &module.version)
                    .await?;
                let average =
                    replace_rating(module.rating_average, module.rating_count, old, saved.rating);
                (saved, average, module.rating_count)
            }
            None => {
                let saved = ratings
                    .create(module_id, user_id, rating.rating, rating.comment, &module.version)
                    .await?;
                let average = add_rating(module.rating_average, module.rating_count, saved.rating);
                (saved, average, module.rating_count + 1)
            }
        };

        let mut module = module.into_active_model();
        module.rating_average = ActiveValue::Set(average);
        module.rating_count = ActiveValue::Set(count);
        modules.update(module).await?;

        txn.commit().await?;
        tracing::debug!(module_id = %module_id, user_id = %user_id, average, "Module rated");

        Ok(saved.into())
    }

    pub async fn ratings(&self, module_id: i32, limit: Option<u64>) -> Result<Vec<RatingDto>, Error> {
        self.find(module_id).await?;

        let limit = limit
            .unwrap_or(DEFAULT_RATINGS_LIMIT)
            .clamp(1, MAX_RATINGS_LIMIT);
        let ratings = RatingRepository::new(self.db)
            .list_visible(module_id, limit)
            .await?;

        Ok(ratings.into_iter().map(RatingDto::from).collect())
    }

    async fn set_status(
        &self,
        module: entity::marketplace_module::Model,
        status: ModuleStatus,
    ) -> Result<ModuleDto, Error> {
        let id = module.id;
        let mut module = module.into_active_model();
        module.status = ActiveValue::Set(status);

        let updated = ModuleRepository::new(self.db).update(module).await?;
        tracing::info!(module_id = %id, status = ?status, "Marketplace module status changed");

        Ok(updated.into())
    }

    async fn find(&self, id: i32) -> Result<entity::marketplace_module::Model, Error> {
        ModuleRepository::new(self.db)
            .get(id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Module", id).into())
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::{InstallationStatus, ModuleCategory, ModuleStatus};
    use topsteel_test_utils::prelude::*;

    use super::*;

    async fn setup() -> Result<TestSetup, TestError> {
        test_setup_with_tables!(
            entity::prelude::Societe,
            entity::prelude::MarketplaceModule,
            entity::prelude::ModuleInstallation,
            entity::prelude::ModuleRating
        )
    }

    fn no_configuration() -> InstallModuleDto {
        InstallModuleDto {
            configuration: None,
        }
    }

    mod rating_average {
        use super::*;

        #[test]
        fn adds_first_rating() {
            assert_eq!(add_rating(0.0, 0, 4), 4.0);
            assert_eq!(add_rating(4.0, 2, 5), 4.33);
        }

        /// Expect the previous score of the user to be replaced, not added
        #[test]
        fn replaces_previous_rating() {
            assert_eq!(replace_rating(4.0, 2, 5, 3), 3.0);
            assert_eq!(replace_rating(5.0, 1, 5, 1), 1.0);
        }
    }

    mod list {
        use super::*;

        /// Expect the text query to match descriptions case-insensitively
        #[tokio::test]
        async fn filters_by_query() -> Result<(), TestError> {
            let test = setup().await?;
            test.marketplace().insert_published_module("stock").await?;
            test.marketplace().insert_published_module("planning").await?;
            let service = MarketplaceService::new(&test.state.db);

            let modules = service
                .list(&ModuleFilter {
                    query: Some("DESCRIPTION OF PLAN".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert_eq!(modules.len(), 1);
            assert_eq!(modules[0].module_key, "planning");

            Ok(())
        }

        /// Expect drafts to be hidden unless requested
        #[tokio::test]
        async fn defaults_to_published() -> Result<(), TestError> {
            let test = setup().await?;
            test.marketplace().insert_published_module("stock").await?;
            test.marketplace()
                .insert_module("brouillon", ModuleStatus::Draft, Vec::new())
                .await?;
            let service = MarketplaceService::new(&test.state.db);

            let published = service.list(&ModuleFilter::default()).await.unwrap();
            let drafts = service
                .list(&ModuleFilter {
                    status: Some(ModuleStatus::Draft),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert_eq!(published.len(), 1);
            assert_eq!(drafts[0].module_key, "brouillon");

            Ok(())
        }

        #[tokio::test]
        async fn filters_paid_modules() -> Result<(), TestError> {
            let test = setup().await?;
            test.marketplace().insert_published_module("stock").await?;
            let service = MarketplaceService::new(&test.state.db);

            let paid = service
                .list(&ModuleFilter {
                    is_free: Some(false),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert!(paid.is_empty());

            Ok(())
        }
    }

    mod create {
        use super::*;

        fn new_module(module_key: &str) -> CreateModuleDto {
            CreateModuleDto {
                module_key: module_key.to_string(),
                display_name: "Qualité".to_string(),
                description: "Contrôle qualité".to_string(),
                short_description: None,
                category: ModuleCategory::Quality,
                publisher: "TopSteel".to_string(),
                version: "1.0.0".to_string(),
                pricing: PricingDto {
                    pricing_type: "ONE_TIME".to_string(),
                    amount: Some(490.0),
                    currency: Some("EUR".to_string()),
                },
                dependencies: Vec::new(),
                permissions: Vec::new(),
                api_routes: Vec::new(),
                menu_configuration: None,
                icon: None,
            }
        }

        /// Expect new modules to start as drafts
        #[tokio::test]
        async fn creates_draft() -> Result<(), TestError> {
            let test = setup().await?;
            let service = MarketplaceService::new(&test.state.db);

            let module = service.create(new_module("qualite"), 1).await.unwrap();

            assert_eq!(module.status, ModuleStatus::Draft);

            Ok(())
        }

        #[tokio::test]
        async fn rejects_duplicate_key() -> Result<(), TestError> {
            let test = setup().await?;
            test.marketplace().insert_published_module("qualite").await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service.create(new_module("qualite"), 1).await;

            assert!(matches!(result, Err(Error::BusinessError(BusinessError::Conflict(_)))));

            Ok(())
        }

        #[tokio::test]
        async fn rejects_unknown_pricing_type() -> Result<(), TestError> {
            let test = setup().await?;
            let service = MarketplaceService::new(&test.state.db);
            let mut module = new_module("qualite");
            module.pricing.pricing_type = "GRATUIT".to_string();

            let result = service.create(module, 1).await;

            assert!(matches!(result, Err(Error::BusinessError(BusinessError::Validation(_)))));

            Ok(())
        }
    }

    mod lifecycle {
        use super::*;

        #[tokio::test]
        async fn publishes_drafts_only() -> Result<(), TestError> {
            let test = setup().await?;
            let draft = test
                .marketplace()
                .insert_module("brouillon", ModuleStatus::Draft, Vec::new())
                .await?;
            let service = MarketplaceService::new(&test.state.db);

            let published = service.publish(draft.id).await.unwrap();
            let again = service.publish(draft.id).await;
            let disabled = service.unpublish(draft.id).await.unwrap();

            assert_eq!(published.status, ModuleStatus::Published);
            assert!(matches!(again, Err(Error::BusinessError(BusinessError::InvalidState(_)))));
            assert_eq!(disabled.status, ModuleStatus::Disabled);

            Ok(())
        }

        /// Expect Forbidden while a societe has the module installed
        #[tokio::test]
        async fn refuses_to_delete_installed_module() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            test.marketplace()
                .insert_installation(societe.id, module.id, InstallationStatus::Installed)
                .await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service.delete(module.id).await;

            assert!(matches!(result, Err(Error::BusinessError(BusinessError::Forbidden(_)))));

            Ok(())
        }
    }

    mod install {
        use super::*;

        /// Expect the installation to be recorded and the download count incremented
        #[tokio::test]
        async fn installs_published_module() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service
                .install(societe.id, module.id, no_configuration(), 7)
                .await
                .unwrap();

            assert!(result.success);
            assert!(result.installation_id.is_some());
            let installed = service.installed(societe.id).await.unwrap();
            assert_eq!(installed.len(), 1);
            assert_eq!(installed[0].module.download_count, 1);
            assert_eq!(installed[0].installation.installed_by, Some(7));
            assert!(installed[0]
                .installation
                .logs
                .iter()
                .any(|log| log.message == "Creating module permissions"));

            Ok(())
        }

        #[tokio::test]
        async fn reports_already_installed() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            let service = MarketplaceService::new(&test.state.db);
            service
                .install(societe.id, module.id, no_configuration(), 7)
                .await
                .unwrap();

            let result = service
                .install(societe.id, module.id, no_configuration(), 7)
                .await
                .unwrap();

            assert!(!result.success);
            assert_eq!(result.message, "Module is already installed");

            Ok(())
        }

        /// Expect the missing dependency keys in the errors
        #[tokio::test]
        async fn reports_missing_dependencies() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test
                .marketplace()
                .insert_module("planning", ModuleStatus::Published, vec!["stock", "rh"])
                .await?;
            let stock = test.marketplace().insert_published_module("stock").await?;
            test.marketplace()
                .insert_installation(societe.id, stock.id, InstallationStatus::Installed)
                .await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service
                .install(societe.id, module.id, no_configuration(), 7)
                .await
                .unwrap();

            assert!(!result.success);
            assert_eq!(result.errors, Some(vec!["rh".to_string()]));

            Ok(())
        }

        #[tokio::test]
        async fn refuses_draft_module() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test
                .marketplace()
                .insert_module("brouillon", ModuleStatus::Draft, Vec::new())
                .await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service
                .install(societe.id, module.id, no_configuration(), 7)
                .await
                .unwrap();

            assert!(!result.success);
            assert!(service.installed(societe.id).await.unwrap().is_empty());

            Ok(())
        }

        /// Expect a failed installation record to be reused
        #[tokio::test]
        async fn reuses_failed_installation() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            let failed = test
                .marketplace()
                .insert_installation(societe.id, module.id, InstallationStatus::Failed)
                .await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service
                .install(societe.id, module.id, no_configuration(), 7)
                .await
                .unwrap();

            assert!(result.success);
            assert_eq!(result.installation_id, Some(failed.id));

            Ok(())
        }
    }

    mod uninstall {
        use super::*;

        #[tokio::test]
        async fn uninstalls_installed_module() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            let service = MarketplaceService::new(&test.state.db);
            service
                .install(societe.id, module.id, no_configuration(), 7)
                .await
                .unwrap();

            let result = service.uninstall(societe.id, module.id, 7).await.unwrap();

            assert!(result.success);
            assert!(service.installed(societe.id).await.unwrap().is_empty());

            Ok(())
        }

        #[tokio::test]
        async fn reports_not_installed() -> Result<(), TestError> {
            let test = setup().await?;
            let societe = test.societe().insert_active_societe().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service.uninstall(societe.id, module.id, 7).await.unwrap();

            assert!(!result.success);
            assert_eq!(result.message, "Module is not installed");

            Ok(())
        }
    }

    mod rate {
        use super::*;

        fn score(rating: i32) -> RateModuleDto {
            RateModuleDto {
                rating,
                comment: None,
            }
        }

        /// Expect a second rating from the same user to replace the first
        #[tokio::test]
        async fn maintains_running_average() -> Result<(), TestError> {
            let test = setup().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            let service = MarketplaceService::new(&test.state.db);

            service.rate(module.id, 1, score(5)).await.unwrap();
            service.rate(module.id, 2, score(4)).await.unwrap();
            service.rate(module.id, 1, score(2)).await.unwrap();

            let module = service.get(module.id).await.unwrap();
            assert_eq!(module.rating_count, 2);
            assert_eq!(module.rating_average, 3.0);
            assert_eq!(service.ratings(module.id, None).await.unwrap().len(), 2);

            Ok(())
        }

        #[tokio::test]
        async fn rejects_out_of_range_rating() -> Result<(), TestError> {
            let test = setup().await?;
            let module = test.marketplace().insert_published_module("stock").await?;
            let service = MarketplaceService::new(&test.state.db);

            let result = service.rate(module.id, 1, score(6)).await;

            assert!(matches!(result, Err(Error::BusinessError(BusinessError::Validation(_)))));

            Ok(())
        }
    }
}
