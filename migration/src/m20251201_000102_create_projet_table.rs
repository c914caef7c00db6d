use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251201_000101_create_client_table::Client;

static IDX_PROJET_STATUT: &str = "idx_projet_statut";
static IDX_PROJET_CLIENT_ID: &str = "idx_projet_client_id";
static FK_PROJET_CLIENT_ID: &str = "fk_projet_client_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projet::Table)
                    .if_not_exists()
                    .col(pk_auto(Projet::Id))
                    .col(string_uniq(Projet::Reference))
                    .col(integer(Projet::ClientId))
                    .col(text(Projet::Description))
                    .col(string_len(Projet::Statut, 20))
                    .col(string_len(Projet::Priorite, 20))
                    .col(date_null(Projet::DateDebut))
                    .col(date_null(Projet::DateFinPrevue))
                    .col(double(Projet::MontantHt))
                    .col(double(Projet::TauxTva))
                    .col(double(Projet::MontantTtc))
                    .col(integer(Projet::Avancement))
                    .col(string_null(Projet::Responsable))
                    .col(timestamp(Projet::CreatedAt))
                    .col(timestamp(Projet::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROJET_CLIENT_ID)
                            .from(Projet::Table, Projet::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROJET_STATUT)
                    .table(Projet::Table)
                    .col(Projet::Statut)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROJET_CLIENT_ID)
                    .table(Projet::Table)
                    .col(Projet::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PROJET_CLIENT_ID)
                    .table(Projet::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PROJET_STATUT)
                    .table(Projet::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Projet::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Projet {
    Table,
    Id,
    Reference,
    ClientId,
    Description,
    Statut,
    Priorite,
    DateDebut,
    DateFinPrevue,
    MontantHt,
    TauxTva,
    MontantTtc,
    Avancement,
    Responsable,
    CreatedAt,
    UpdatedAt,
}
