use chrono::Utc;
use entity::sea_orm_active_enums::SocieteStatus;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{constant::TEST_SOCIETE_CODE, error::TestError, model::SocieteModel, TestSetup};

impl TestSetup {
    pub fn societe<'a>(&'a self) -> SocieteFixtures<'a> {
        SocieteFixtures { setup: self }
    }
}

pub struct SocieteFixtures<'a> {
    setup: &'a TestSetup,
}

impl<'a> SocieteFixtures<'a> {
    pub async fn insert_societe(
        &self,
        code: &str,
        status: SocieteStatus,
    ) -> Result<SocieteModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::Societe::insert(entity::societe::ActiveModel {
                code: ActiveValue::Set(code.to_string()),
                nom: ActiveValue::Set(format!("Societe {}", code)),
                status: ActiveValue::Set(status),
                database_name: ActiveValue::Set(format!("erp_tenant_{}", code.to_lowercase())),
                max_users: ActiveValue::Set(10),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }

    /// Inserts the active [`TEST_SOCIETE_CODE`] societe.
    pub async fn insert_active_societe(&self) -> Result<SocieteModel, TestError> {
        self.insert_societe(TEST_SOCIETE_CODE, SocieteStatus::Active)
            .await
    }
}
