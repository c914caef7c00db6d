pub use sea_orm_migration::prelude::*;

mod m20251201_000001_create_societe_table;
mod m20251201_000002_create_system_parameter_table;
mod m20251201_000003_create_marketplace_module_table;
mod m20251201_000004_create_module_installation_table;
mod m20251201_000005_create_module_rating_table;
mod m20251201_000101_create_client_table;
mod m20251201_000102_create_projet_table;
mod m20251201_000103_create_material_table;
mod m20251201_000104_create_material_movement_table;

/// Migrations of the shared database (societes, parameters, marketplace).
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251201_000001_create_societe_table::Migration),
            Box::new(m20251201_000002_create_system_parameter_table::Migration),
            Box::new(m20251201_000003_create_marketplace_module_table::Migration),
            Box::new(m20251201_000004_create_module_installation_table::Migration),
            Box::new(m20251201_000005_create_module_rating_table::Migration),
        ]
    }
}

/// Migrations applied to every tenant database.
pub struct TenantMigrator;

#[async_trait::async_trait]
impl MigratorTrait for TenantMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251201_000101_create_client_table::Migration),
            Box::new(m20251201_000102_create_projet_table::Migration),
            Box::new(m20251201_000103_create_material_table::Migration),
            Box::new(m20251201_000104_create_material_movement_table::Migration),
        ]
    }
}
