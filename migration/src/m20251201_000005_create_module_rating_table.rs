use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251201_000003_create_marketplace_module_table::MarketplaceModule;

static IDX_MODULE_RATING_MODULE_USER: &str = "idx_module_rating_module_user";
static FK_MODULE_RATING_MODULE_ID: &str = "fk_module_rating_module_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModuleRating::Table)
                    .if_not_exists()
                    .col(pk_auto(ModuleRating::Id))
                    .col(integer(ModuleRating::ModuleId))
                    .col(integer(ModuleRating::UserId))
                    .col(integer(ModuleRating::Rating))
                    .col(text_null(ModuleRating::Comment))
                    .col(string_null(ModuleRating::Version))
                    .col(boolean(ModuleRating::IsVisible))
                    .col(timestamp(ModuleRating::CreatedAt))
                    .col(timestamp(ModuleRating::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MODULE_RATING_MODULE_ID)
                            .from(ModuleRating::Table, ModuleRating::ModuleId)
                            .to(MarketplaceModule::Table, MarketplaceModule::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MODULE_RATING_MODULE_USER)
                    .table(ModuleRating::Table)
                    .col(ModuleRating::ModuleId)
                    .col(ModuleRating::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MODULE_RATING_MODULE_USER)
                    .table(ModuleRating::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ModuleRating::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ModuleRating {
    Table,
    Id,
    ModuleId,
    UserId,
    Rating,
    Comment,
    Version,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}
