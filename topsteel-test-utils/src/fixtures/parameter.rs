use chrono::Utc;
use entity::sea_orm_active_enums::ParameterType;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, model::ParameterModel, TestSetup};

impl TestSetup {
    pub fn parameter<'a>(&'a self) -> ParameterFixtures<'a> {
        ParameterFixtures { setup: self }
    }
}

pub struct ParameterFixtures<'a> {
    setup: &'a TestSetup,
}

impl<'a> ParameterFixtures<'a> {
    pub async fn insert_parameter(
        &self,
        key: &str,
        value: &str,
        parameter_type: ParameterType,
        is_readonly: bool,
    ) -> Result<ParameterModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::SystemParameter::insert(entity::system_parameter::ActiveModel {
                key: ActiveValue::Set(key.to_string()),
                value: ActiveValue::Set(value.to_string()),
                parameter_type: ActiveValue::Set(parameter_type),
                category: ActiveValue::Set("general".to_string()),
                description: ActiveValue::Set(None),
                is_readonly: ActiveValue::Set(is_readonly),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }
}
