use chrono::Utc;
use entity::sea_orm_active_enums::MaterialType;
use sea_orm::{
    sea_query::{Expr, ExprTrait},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::model::material::{MaterialFilter, StockCondition};

pub struct MaterialRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MaterialRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a material built by the caller, stamping both timestamps
    pub async fn create(
        &self,
        mut material: entity::material::ActiveModel,
    ) -> Result<entity::material::Model, DbErr> {
        let now = Utc::now().naive_utc();
        material.created_at = ActiveValue::Set(now);
        material.updated_at = ActiveValue::Set(now);

        material.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::material::Model>, DbErr> {
        entity::prelude::Material::find_by_id(id).one(self.db).await
    }

    pub async fn reference_exists(&self, reference: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Material::find()
            .filter(entity::material::Column::Reference.eq(reference))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn count_by_type(&self, material_type: MaterialType) -> Result<u64, DbErr> {
        entity::prelude::Material::find()
            .filter(entity::material::Column::MaterialType.eq(material_type))
            .count(self.db)
            .await
    }

    /// Returns one page of materials matching the filter, ordered by reference, and the
    /// total number of matches.
    pub async fn list(
        &self,
        filter: &MaterialFilter,
    ) -> Result<(Vec<entity::material::Model>, u64), DbErr> {
        let mut query = entity::prelude::Material::find();

        if let Some(material_type) = filter.material_type {
            query = query.filter(entity::material::Column::MaterialType.eq(material_type));
        }
        if let Some(forme) = filter.forme {
            query = query.filter(entity::material::Column::Forme.eq(forme));
        }
        if let Some(status) = filter.status {
            query = query.filter(entity::material::Column::Status.eq(status));
        }
        // Thresholds compare the available stock, physique minus reserve
        match filter.stock {
            Some(StockCondition::Rupture) => {
                query = query.filter(Expr::cust("stock_physique - stock_reserve <= 0"));
            }
            Some(StockCondition::SousMini) => {
                query = query.filter(Expr::cust("stock_physique - stock_reserve < stock_mini"));
            }
            None => {}
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let search = search.trim();
            query = query.filter(
                entity::material::Column::Reference
                    .contains(search)
                    .or(entity::material::Column::Nom.contains(search))
                    .or(entity::material::Column::Nuance.contains(search)),
            );
        }

        let pagination = filter.pagination();
        let paginator = query
            .order_by_asc(entity::material::Column::Reference)
            .paginate(self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let materials = paginator.fetch_page(pagination.page()).await?;

        Ok((materials, total))
    }

    pub async fn all(&self) -> Result<Vec<entity::material::Model>, DbErr> {
        entity::prelude::Material::find()
            .order_by_asc(entity::material::Column::Reference)
            .all(self.db)
            .await
    }

    /// Persists the changed fields of `material` and stamps `updated_at`
    pub async fn update(
        &self,
        mut material: entity::material::ActiveModel,
    ) -> Result<entity::material::Model, DbErr> {
        material.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        material.update(self.db).await
    }

    /// Deletes a material
    ///
    /// Returns OK regardless of the material existing, check [`DeleteResult::rows_affected`].
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Material::delete_by_id(id).exec(self.db).await
    }
}
