use sea_orm_migration::{prelude::*, schema::*};

static IDX_SYSTEM_PARAMETER_CATEGORY: &str = "idx_system_parameter_category";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemParameter::Table)
                    .if_not_exists()
                    .col(pk_auto(SystemParameter::Id))
                    .col(string_uniq(SystemParameter::Key))
                    .col(text(SystemParameter::Value))
                    .col(string_len(SystemParameter::ParameterType, 20))
                    .col(string(SystemParameter::Category))
                    .col(string_null(SystemParameter::Description))
                    .col(boolean(SystemParameter::IsReadonly))
                    .col(timestamp(SystemParameter::CreatedAt))
                    .col(timestamp(SystemParameter::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SYSTEM_PARAMETER_CATEGORY)
                    .table(SystemParameter::Table)
                    .col(SystemParameter::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SYSTEM_PARAMETER_CATEGORY)
                    .table(SystemParameter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SystemParameter::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SystemParameter {
    Table,
    Id,
    Key,
    Value,
    ParameterType,
    Category,
    Description,
    IsReadonly,
    CreatedAt,
    UpdatedAt,
}
