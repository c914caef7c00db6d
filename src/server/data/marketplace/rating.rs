use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

pub struct RatingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RatingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        module_id: i32,
        user_id: i32,
        rating: i32,
        comment: Option<String>,
        version: &str,
    ) -> Result<entity::module_rating::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let rating = entity::module_rating::ActiveModel {
            module_id: ActiveValue::Set(module_id),
            user_id: ActiveValue::Set(user_id),
            rating: ActiveValue::Set(rating),
            comment: ActiveValue::Set(comment),
            version: ActiveValue::Set(Some(version.to_string())),
            is_visible: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        rating.insert(self.db).await
    }

    pub async fn find(
        &self,
        module_id: i32,
        user_id: i32,
    ) -> Result<Option<entity::module_rating::Model>, DbErr> {
        entity::prelude::ModuleRating::find()
            .filter(entity::module_rating::Column::ModuleId.eq(module_id))
            .filter(entity::module_rating::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn update(
        &self,
        rating: entity::module_rating::Model,
        score: i32,
        comment: Option<String>,
        version: &str,
    ) -> Result<entity::module_rating::Model, DbErr> {
        let mut rating: entity::module_rating::ActiveModel = rating.into();
        rating.rating = ActiveValue::Set(score);
        rating.comment = ActiveValue::Set(comment);
        rating.version = ActiveValue::Set(Some(version.to_string()));
        rating.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        rating.update(self.db).await
    }

    /// Visible ratings of a module, newest first
    pub async fn list_visible(
        &self,
        module_id: i32,
        limit: u64,
    ) -> Result<Vec<entity::module_rating::Model>, DbErr> {
        entity::prelude::ModuleRating::find()
            .filter(entity::module_rating::Column::ModuleId.eq(module_id))
            .filter(entity::module_rating::Column::IsVisible.eq(true))
            .order_by_desc(entity::module_rating::Column::CreatedAt)
            .order_by_desc(entity::module_rating::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }
}
