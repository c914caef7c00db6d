use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251201_000001_create_societe_table::Societe,
    m20251201_000003_create_marketplace_module_table::MarketplaceModule,
};

static IDX_MODULE_INSTALLATION_SOCIETE_MODULE: &str = "idx_module_installation_societe_module";
static FK_MODULE_INSTALLATION_SOCIETE_ID: &str = "fk_module_installation_societe_id";
static FK_MODULE_INSTALLATION_MODULE_ID: &str = "fk_module_installation_module_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModuleInstallation::Table)
                    .if_not_exists()
                    .col(pk_auto(ModuleInstallation::Id))
                    .col(integer(ModuleInstallation::SocieteId))
                    .col(integer(ModuleInstallation::ModuleId))
                    .col(string(ModuleInstallation::InstalledVersion))
                    .col(string_len(ModuleInstallation::Status, 20))
                    .col(json_null(ModuleInstallation::Configuration))
                    .col(integer_null(ModuleInstallation::InstalledBy))
                    .col(timestamp_null(ModuleInstallation::InstalledAt))
                    .col(integer_null(ModuleInstallation::UninstalledBy))
                    .col(timestamp_null(ModuleInstallation::UninstalledAt))
                    .col(text_null(ModuleInstallation::FailureReason))
                    .col(json(ModuleInstallation::Logs))
                    .col(boolean(ModuleInstallation::IsActive))
                    .col(timestamp(ModuleInstallation::CreatedAt))
                    .col(timestamp(ModuleInstallation::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MODULE_INSTALLATION_SOCIETE_ID)
                            .from(ModuleInstallation::Table, ModuleInstallation::SocieteId)
                            .to(Societe::Table, Societe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MODULE_INSTALLATION_MODULE_ID)
                            .from(ModuleInstallation::Table, ModuleInstallation::ModuleId)
                            .to(MarketplaceModule::Table, MarketplaceModule::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MODULE_INSTALLATION_SOCIETE_MODULE)
                    .table(ModuleInstallation::Table)
                    .col(ModuleInstallation::SocieteId)
                    .col(ModuleInstallation::ModuleId)
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
                    .name(IDX_MODULE_INSTALLATION_SOCIETE_MODULE)
                    .table(ModuleInstallation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ModuleInstallation::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ModuleInstallation {
    Table,
    Id,
    SocieteId,
    ModuleId,
    InstalledVersion,
    Status,
    Configuration,
    InstalledBy,
    InstalledAt,
    UninstalledBy,
    UninstalledAt,
    FailureReason,
    Logs,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
