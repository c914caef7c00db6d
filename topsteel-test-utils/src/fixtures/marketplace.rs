use chrono::Utc;
use entity::{
    marketplace_module::{Pricing, StringList},
    module_installation::InstallationLogs,
    sea_orm_active_enums::{InstallationStatus, ModuleCategory, ModuleStatus},
};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    error::TestError,
    model::{InstallationModel, ModuleModel},
    TestSetup,
};

impl TestSetup {
    pub fn marketplace<'a>(&'a self) -> MarketplaceFixtures<'a> {
        MarketplaceFixtures { setup: self }
    }
}

pub struct MarketplaceFixtures<'a> {
    setup: &'a TestSetup,
}

impl<'a> MarketplaceFixtures<'a> {
    pub async fn insert_module(
        &self,
        module_key: &str,
        status: ModuleStatus,
        dependencies: Vec<&str>,
    ) -> Result<ModuleModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::MarketplaceModule::insert(entity::marketplace_module::ActiveModel {
                module_key: ActiveValue::Set(module_key.to_string()),
                display_name: ActiveValue::Set(format!("Module {}", module_key)),
                description: ActiveValue::Set(format!("Description of {}", module_key)),
                short_description: ActiveValue::Set(None),
                category: ActiveValue::Set(ModuleCategory::Production),
                publisher: ActiveValue::Set("TopSteel".to_string()),
                version: ActiveValue::Set("1.0.0".to_string()),
                status: ActiveValue::Set(status),
                pricing: ActiveValue::Set(Pricing {
                    pricing_type: "FREE".to_string(),
                    amount: None,
                    currency: None,
                }),
                dependencies: ActiveValue::Set(StringList(
                    dependencies.into_iter().map(String::from).collect(),
                )),
                permissions: ActiveValue::Set(StringList(vec![format!("{}:read", module_key)])),
                api_routes: ActiveValue::Set(StringList::default()),
                menu_configuration: ActiveValue::Set(None),
                icon: ActiveValue::Set(None),
                download_count: ActiveValue::Set(0),
                rating_average: ActiveValue::Set(0.0),
                rating_count: ActiveValue::Set(0),
                is_active: ActiveValue::Set(true),
                created_by: ActiveValue::Set(None),
                updated_by: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }

    pub async fn insert_published_module(&self, module_key: &str) -> Result<ModuleModel, TestError> {
        self.insert_module(module_key, ModuleStatus::Published, Vec::new())
            .await
    }

    pub async fn insert_installation(
        &self,
        societe_id: i32,
        module_id: i32,
        status: InstallationStatus,
    ) -> Result<InstallationModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::ModuleInstallation::insert(entity::module_installation::ActiveModel {
                societe_id: ActiveValue::Set(societe_id),
                module_id: ActiveValue::Set(module_id),
                installed_version: ActiveValue::Set("1.0.0".to_string()),
                status: ActiveValue::Set(status),
                configuration: ActiveValue::Set(None),
                installed_by: ActiveValue::Set(None),
                installed_at: ActiveValue::Set(Some(now)),
                uninstalled_by: ActiveValue::Set(None),
                uninstalled_at: ActiveValue::Set(None),
                failure_reason: ActiveValue::Set(None),
                logs: ActiveValue::Set(InstallationLogs::default()),
                is_active: ActiveValue::Set(status == InstallationStatus::Installed),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }
}
