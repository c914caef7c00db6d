use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

pub struct MaterialMovementRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MaterialMovementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        movement: entity::material_movement::ActiveModel,
    ) -> Result<entity::material_movement::Model, DbErr> {
        movement.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::material_movement::Model>, DbErr> {
        entity::prelude::MaterialMovement::find_by_id(id)
            .one(self.db)
            .await
    }

    /// Movements of a material, newest first
    pub async fn list_by_material(
        &self,
        material_id: i32,
    ) -> Result<Vec<entity::material_movement::Model>, DbErr> {
        entity::prelude::MaterialMovement::find()
            .filter(entity::material_movement::Column::MaterialId.eq(material_id))
            .order_by_desc(entity::material_movement::Column::CreatedAt)
            .order_by_desc(entity::material_movement::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn count_by_material(&self, material_id: i32) -> Result<u64, DbErr> {
        entity::prelude::MaterialMovement::find()
            .filter(entity::material_movement::Column::MaterialId.eq(material_id))
            .count(self.db)
            .await
    }

    /// Counts movements whose reference carries `date`, whatever their type
    pub async fn count_for_day(&self, date: NaiveDate) -> Result<u64, DbErr> {
        entity::prelude::MaterialMovement::find()
            .filter(
                entity::material_movement::Column::Reference
                    .like(format!("MVT-_-{}-%", date.format("%Y%m%d"))),
            )
            .count(self.db)
            .await
    }

    pub async fn reference_exists(&self, reference: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::MaterialMovement::find()
            .filter(entity::material_movement::Column::Reference.eq(reference))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn update(
        &self,
        movement: entity::material_movement::ActiveModel,
    ) -> Result<entity::material_movement::Model, DbErr> {
        movement.update(self.db).await
    }
}
