use sea_orm_migration::{prelude::*, schema::*};

static IDX_CLIENT_DENOMINATION: &str = "idx_client_denomination";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(pk_auto(Client::Id))
                    .col(string_uniq(Client::Code))
                    .col(string_len(Client::ClientType, 20))
                    .col(string_len(Client::Status, 20))
                    .col(string(Client::Denomination))
                    .col(string_null(Client::Siret))
                    .col(string_null(Client::NumeroTva))
                    .col(string_null(Client::ContactPrincipal))
                    .col(string_null(Client::Email))
                    .col(string_null(Client::Telephone))
                    .col(string_null(Client::Adresse))
                    .col(string_null(Client::CodePostal))
                    .col(string_null(Client::Ville))
                    .col(string(Client::Pays))
                    .col(double_null(Client::PlafondCredit))
                    .col(double_null(Client::TauxRemise))
                    .col(text_null(Client::Notes))
                    .col(string_null(Client::SuspensionReason))
                    .col(timestamp(Client::CreatedAt))
                    .col(timestamp(Client::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CLIENT_DENOMINATION)
                    .table(Client::Table)
                    .col(Client::Denomination)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CLIENT_DENOMINATION)
                    .table(Client::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Client::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Client {
    Table,
    Id,
    Code,
    ClientType,
    Status,
    Denomination,
    Siret,
    NumeroTva,
    ContactPrincipal,
    Email,
    Telephone,
    Adresse,
    CodePostal,
    Ville,
    Pays,
    PlafondCredit,
    TauxRemise,
    Notes,
    SuspensionReason,
    CreatedAt,
    UpdatedAt,
}
