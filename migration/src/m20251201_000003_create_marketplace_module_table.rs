use sea_orm_migration::{prelude::*, schema::*};

static IDX_MARKETPLACE_MODULE_STATUS: &str = "idx_marketplace_module_status";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MarketplaceModule::Table)
                    .if_not_exists()
                    .col(pk_auto(MarketplaceModule::Id))
                    .col(string_uniq(MarketplaceModule::ModuleKey))
                    .col(string(MarketplaceModule::DisplayName))
                    .col(text(MarketplaceModule::Description))
                    .col(string_null(MarketplaceModule::ShortDescription))
                    .col(string_len(MarketplaceModule::Category, 20))
                    .col(string(MarketplaceModule::Publisher))
                    .col(string(MarketplaceModule::Version))
                    .col(string_len(MarketplaceModule::Status, 20))
                    .col(json(MarketplaceModule::Pricing))
                    .col(json(MarketplaceModule::Dependencies))
                    .col(json(MarketplaceModule::Permissions))
                    .col(json(MarketplaceModule::ApiRoutes))
                    .col(json_null(MarketplaceModule::MenuConfiguration))
                    .col(string_null(MarketplaceModule::Icon))
                    .col(integer(MarketplaceModule::DownloadCount))
                    .col(double(MarketplaceModule::RatingAverage))
                    .col(integer(MarketplaceModule::RatingCount))
                    .col(boolean(MarketplaceModule::IsActive))
                    .col(integer_null(MarketplaceModule::CreatedBy))
                    .col(integer_null(MarketplaceModule::UpdatedBy))
                    .col(timestamp(MarketplaceModule::CreatedAt))
                    .col(timestamp(MarketplaceModule::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MARKETPLACE_MODULE_STATUS)
                    .table(MarketplaceModule::Table)
                    .col(MarketplaceModule::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MARKETPLACE_MODULE_STATUS)
                    .table(MarketplaceModule::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MarketplaceModule::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum MarketplaceModule {
    Table,
    Id,
    ModuleKey,
    DisplayName,
    Description,
    ShortDescription,
    Category,
    Publisher,
    Version,
    Status,
    Pricing,
    Dependencies,
    Permissions,
    ApiRoutes,
    MenuConfiguration,
    Icon,
    DownloadCount,
    RatingAverage,
    RatingCount,
    IsActive,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
