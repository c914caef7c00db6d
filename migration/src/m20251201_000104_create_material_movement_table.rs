use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251201_000103_create_material_table::Material;

static IDX_MATERIAL_MOVEMENT_MATERIAL_ID: &str = "idx_material_movement_material_id";
static FK_MATERIAL_MOVEMENT_MATERIAL_ID: &str = "fk_material_movement_material_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaterialMovement::Table)
                    .if_not_exists()
                    .col(pk_auto(MaterialMovement::Id))
                    .col(string_uniq(MaterialMovement::Reference))
                    .col(integer(MaterialMovement::MaterialId))
                    .col(string_len(MaterialMovement::MovementType, 20))
                    .col(string_len(MaterialMovement::Status, 20))
                    .col(double(MaterialMovement::Quantite))
                    .col(double(MaterialMovement::StockAvant))
                    .col(double(MaterialMovement::StockApres))
                    .col(double_null(MaterialMovement::ValeurUnitaire))
                    .col(double_null(MaterialMovement::ValeurTotale))
                    .col(string_null(MaterialMovement::Motif))
                    .col(string_null(MaterialMovement::EmplacementSource))
                    .col(string_null(MaterialMovement::EmplacementDestination))
                    .col(integer_null(MaterialMovement::CreatedBy))
                    .col(integer_null(MaterialMovement::ValidatedBy))
                    .col(timestamp_null(MaterialMovement::ValidatedAt))
                    .col(timestamp(MaterialMovement::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MATERIAL_MOVEMENT_MATERIAL_ID)
                            .from(MaterialMovement::Table, MaterialMovement::MaterialId)
                            .to(Material::Table, Material::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MATERIAL_MOVEMENT_MATERIAL_ID)
                    .table(MaterialMovement::Table)
                    .col(MaterialMovement::MaterialId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MATERIAL_MOVEMENT_MATERIAL_ID)
                    .table(MaterialMovement::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MaterialMovement::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MaterialMovement {
    Table,
    Id,
    Reference,
    MaterialId,
    MovementType,
    Status,
    Quantite,
    StockAvant,
    StockApres,
    ValeurUnitaire,
    ValeurTotale,
    Motif,
    EmplacementSource,
    EmplacementDestination,
    CreatedBy,
    ValidatedBy,
    ValidatedAt,
    CreatedAt,
}
