use sea_orm_migration::{prelude::*, schema::*};

static IDX_MATERIAL_TYPE_FORME: &str = "idx_material_type_forme";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Material::Table)
                    .if_not_exists()
                    .col(pk_auto(Material::Id))
                    .col(string_uniq(Material::Reference))
                    .col(string(Material::Nom))
                    .col(string_len(Material::MaterialType, 20))
                    .col(string_len(Material::Forme, 20))
                    .col(string_len(Material::Status, 20))
                    .col(string_null(Material::Nuance))
                    .col(string(Material::Unite))
                    .col(json(Material::Dimensions))
                    .col(double_null(Material::PoidsUnitaire))
                    .col(double_null(Material::Densite))
                    .col(double_null(Material::PrixUnitaire))
                    .col(double(Material::StockPhysique))
                    .col(double(Material::StockReserve))
                    .col(double(Material::StockMini))
                    .col(double(Material::StockMaxi))
                    .col(string_null(Material::Emplacement))
                    .col(boolean(Material::Dangereux))
                    .col(timestamp_null(Material::DateDernierInventaire))
                    .col(timestamp(Material::CreatedAt))
                    .col(timestamp(Material::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MATERIAL_TYPE_FORME)
                    .table(Material::Table)
                    .col(Material::MaterialType)
                    .col(Material::Forme)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MATERIAL_TYPE_FORME)
                    .table(Material::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Material::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Material {
    Table,
    Id,
    Reference,
    Nom,
    MaterialType,
    Forme,
    Status,
    Nuance,
    Unite,
    Dimensions,
    PoidsUnitaire,
    Densite,
    PrixUnitaire,
    StockPhysique,
    StockReserve,
    StockMini,
    StockMaxi,
    Emplacement,
    Dangereux,
    DateDernierInventaire,
    CreatedAt,
    UpdatedAt,
}
