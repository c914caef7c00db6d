use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Societe::Table)
                    .if_not_exists()
                    .col(pk_auto(Societe::Id))
                    .col(string_uniq(Societe::Code))
                    .col(string(Societe::Nom))
                    .col(string_len(Societe::Status, 20))
                    .col(string(Societe::DatabaseName))
                    .col(integer(Societe::MaxUsers))
                    .col(timestamp(Societe::CreatedAt))
                    .col(timestamp(Societe::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Societe::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Societe {
    Table,
    Id,
    Code,
    Nom,
    Status,
    DatabaseName,
    MaxUsers,
    CreatedAt,
    UpdatedAt,
}
