use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::model::parameter::CreateParameterDto;

pub struct SystemParameterRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SystemParameterRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        parameter: &CreateParameterDto,
    ) -> Result<entity::system_parameter::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let parameter = entity::system_parameter::ActiveModel {
            key: ActiveValue::Set(parameter.key.clone()),
            value: ActiveValue::Set(parameter.value.clone()),
            parameter_type: ActiveValue::Set(parameter.parameter_type),
            category: ActiveValue::Set(parameter.category.clone()),
            description: ActiveValue::Set(parameter.description.clone()),
            is_readonly: ActiveValue::Set(parameter.is_readonly),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        parameter.insert(self.db).await
    }

    /// Lists parameters ordered by category then key
    pub async fn list(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<entity::system_parameter::Model>, DbErr> {
        let mut query = entity::prelude::SystemParameter::find();
        if let Some(category) = category {
            query = query.filter(entity::system_parameter::Column::Category.eq(category));
        }

        query
            .order_by_asc(entity::system_parameter::Column::Category)
            .order_by_asc(entity::system_parameter::Column::Key)
            .all(self.db)
            .await
    }

    pub async fn find_by_key(
        &self,
        key: &str,
    ) -> Result<Option<entity::system_parameter::Model>, DbErr> {
        entity::prelude::SystemParameter::find()
            .filter(entity::system_parameter::Column::Key.eq(key))
            .one(self.db)
            .await
    }

    pub async fn update_value(
        &self,
        parameter: entity::system_parameter::Model,
        value: String,
        description: Option<String>,
    ) -> Result<entity::system_parameter::Model, DbErr> {
        let keep_description = description.is_none();
        let mut parameter: entity::system_parameter::ActiveModel = parameter.into();
        parameter.value = ActiveValue::Set(value);
        if !keep_description {
            parameter.description = ActiveValue::Set(description);
        }
        parameter.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        parameter.update(self.db).await
    }

    /// Deletes a parameter
    ///
    /// Returns OK regardless of the parameter existing, check [`DeleteResult::rows_affected`].
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::SystemParameter::delete_by_id(id)
            .exec(self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::SystemParameter::find().count(self.db).await
    }
}
