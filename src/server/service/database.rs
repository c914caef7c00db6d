use std::collections::BTreeMap;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, IdenStatic, Iterable};

use crate::{
    model::{
        admin::{
            ConnectionStatusDto, IntegrityReportDto, IntegritySummaryDto, TableCheckDto,
            TableStatus,
        },
        api::OperationResultDto,
    },
    server::{data::schema::SchemaRepository, error::Error, service::parameter::ParameterService},
};

pub const SHARED_DATABASE: &str = "shared";

/// A table the entity model expects, with its columns in declaration order
#[derive(Debug, Clone)]
pub struct ExpectedTable {
    pub name: String,
    pub columns: Vec<String>,
}

impl ExpectedTable {
    pub fn of<E: EntityTrait>() -> Self {
        Self {
            name: E::default().table_name().to_string(),
            columns: E::Column::iter()
                .map(|column| column.as_str().to_string())
                .collect(),
        }
    }
}

pub fn shared_tables() -> Vec<ExpectedTable> {
    vec![
        ExpectedTable::of::<entity::prelude::Societe>(),
        ExpectedTable::of::<entity::prelude::SystemParameter>(),
        ExpectedTable::of::<entity::prelude::MarketplaceModule>(),
        ExpectedTable::of::<entity::prelude::ModuleInstallation>(),
        ExpectedTable::of::<entity::prelude::ModuleRating>(),
    ]
}

pub fn tenant_tables() -> Vec<ExpectedTable> {
    vec![
        ExpectedTable::of::<entity::prelude::Client>(),
        ExpectedTable::of::<entity::prelude::Projet>(),
        ExpectedTable::of::<entity::prelude::Material>(),
        ExpectedTable::of::<entity::prelude::MaterialMovement>(),
    ]
}

/// Schema checks and maintenance of one database, shared or tenant
pub struct DatabaseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DatabaseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Compares the live schema against `expected`.
    ///
    /// Present tables lacking expected columns are reported with status `error`.
    pub async fn integrity(
        &self,
        database: &str,
        expected: &[ExpectedTable],
    ) -> Result<IntegrityReportDto, Error> {
        let repo = SchemaRepository::new(self.db);

        let mut actual: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for table in repo.list_tables().await? {
            let columns = repo.list_columns(&table).await?;
            actual.insert(table, columns);
        }

        let mut tables = Vec::with_capacity(expected.len() + actual.len());
        for table in expected {
            let check = match actual.remove(&table.name) {
                None => TableCheckDto {
                    table: table.name.clone(),
                    status: TableStatus::Missing,
                    columns: table.columns.clone(),
                    message: None,
                },
                Some(columns) => {
                    let missing: Vec<&str> = table
                        .columns
                        .iter()
                        .filter(|column| !columns.contains(*column))
                        .map(String::as_str)
                        .collect();

                    if missing.is_empty() {
                        TableCheckDto {
                            table: table.name.clone(),
                            status: TableStatus::Ok,
                            columns,
                            message: None,
                        }
                    } else {
                        TableCheckDto {
                            table: table.name.clone(),
                            status: TableStatus::Error,
                            message: Some(format!("Missing columns: {}", missing.join(", "))),
                            columns,
                        }
                    }
                }
            };
            tables.push(check);
        }
        tables.extend(actual.into_iter().map(|(table, columns)| TableCheckDto {
            table,
            status: TableStatus::Extra,
            columns,
            message: None,
        }));

        let mut summary = IntegritySummaryDto {
            total: tables.len(),
            ..Default::default()
        };
        for table in &tables {
            match table.status {
                TableStatus::Ok => summary.ok += 1,
                TableStatus::Missing => summary.missing += 1,
                TableStatus::Extra => summary.extra += 1,
                TableStatus::Error => summary.errors += 1,
            }
        }

        if summary.missing > 0 || summary.errors > 0 {
            tracing::warn!(
                database = %database,
                missing = summary.missing,
                errors = summary.errors,
                "Database schema is incomplete"
            );
        }

        Ok(IntegrityReportDto {
            database: database.to_string(),
            can_synchronize: summary.missing > 0 && summary.errors == 0,
            tables,
            summary,
        })
    }

    /// Applies pending shared migrations then seeds default parameters.
    ///
    /// Failures are reported in the payload, never as an error.
    pub async fn synchronize(&self) -> OperationResultDto {
        let pending = match Migrator::get_pending_migrations(self.db).await {
            Ok(pending) => pending
                .iter()
                .map(|migration| migration.name().to_string())
                .collect::<Vec<_>>(),
            Err(err) => {
                tracing::error!("Failed to read migration status: {}", err);
                return OperationResultDto::failed(format!("Failed to read migration status: {}", err));
            }
        };

        if let Err(err) = Migrator::up(self.db, None).await {
            tracing::error!("Database synchronization failed: {}", err);
            return OperationResultDto::failed(format!("Migration failed: {}", err))
                .with_details(pending);
        }

        let seeded = match ParameterService::new(self.db).seed_defaults().await {
            Ok(seeded) => seeded,
            Err(err) => {
                tracing::error!("Seeding default parameters failed: {}", err);
                return OperationResultDto::failed(format!(
                    "Migrations applied but seeding default parameters failed: {}",
                    err
                ));
            }
        };

        tracing::info!(migrations = pending.len(), seeded, "Database synchronized");

        let mut details: Vec<String> = pending
            .into_iter()
            .map(|name| format!("Applied {}", name))
            .collect();
        if seeded > 0 {
            details.push(format!("Seeded {} default parameters", seeded));
        }

        let result = OperationResultDto::ok("Database synchronized");
        if details.is_empty() {
            result
        } else {
            result.with_details(details)
        }
    }

    pub async fn connection(&self) -> ConnectionStatusDto {
        match SchemaRepository::new(self.db).server_version().await {
            Ok(version) => ConnectionStatusDto {
                connected: true,
                version: Some(version),
                error: None,
            },
            Err(err) => {
                tracing::warn!(backend = ?self.db.get_database_backend(), "Database connection check failed: {}", err);

                ConnectionStatusDto {
                    connected: false,
                    version: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use topsteel_test_utils::prelude::*;

    use super::*;

    #[test]
    fn derives_tables_from_entities() {
        let societe = ExpectedTable::of::<entity::prelude::Societe>();

        assert_eq!(societe.name, "societe");
        assert_eq!(societe.columns[0], "id");
        assert!(societe.columns.contains(&"database_name".to_string()));
    }

    /// Expect missing tables to be reported and synchronization to be possible
    #[tokio::test]
    async fn reports_missing_tables() -> Result<(), TestError> {
        let test =
            test_setup_with_tables!(entity::prelude::Societe, entity::prelude::SystemParameter)?;
        let service = DatabaseService::new(&test.state.db);

        let report = service.integrity(SHARED_DATABASE, &shared_tables()).await.unwrap();

        assert_eq!(report.summary.ok, 2);
        assert_eq!(report.summary.missing, 3);
        assert!(report.can_synchronize);
        let installation = report
            .tables
            .iter()
            .find(|t| t.table == "module_installation")
            .unwrap();
        assert_eq!(installation.status, TableStatus::Missing);

        Ok(())
    }

    /// Expect tables outside the entity model to be flagged as extra
    #[tokio::test]
    async fn reports_extra_tables() -> Result<(), TestError> {
        let test = test_setup_with_tenant_tables!()?;
        test.state
            .tenant_db
            .execute_unprepared("CREATE TABLE legacy_stock (id INTEGER PRIMARY KEY)")
            .await?;
        let service = DatabaseService::new(&test.state.tenant_db);

        let report = service.integrity("ACME", &tenant_tables()).await.unwrap();

        assert_eq!(report.summary.ok, 4);
        assert_eq!(report.summary.extra, 1);
        assert!(!report.can_synchronize);

        Ok(())
    }

    /// Expect an incomplete table to block synchronization
    #[tokio::test]
    async fn reports_missing_columns() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        test.state
            .db
            .execute_unprepared("CREATE TABLE societe (id INTEGER PRIMARY KEY, code TEXT)")
            .await?;
        let service = DatabaseService::new(&test.state.db);

        let report = service.integrity(SHARED_DATABASE, &shared_tables()).await.unwrap();

        let societe = report.tables.iter().find(|t| t.table == "societe").unwrap();
        assert_eq!(societe.status, TableStatus::Error);
        assert!(!report.can_synchronize);

        Ok(())
    }

    /// Expect an empty database to be fully migrated and seeded
    #[tokio::test]
    async fn synchronizes_empty_database() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let service = DatabaseService::new(&test.state.db);

        let result = service.synchronize().await;
        let again = service.synchronize().await;

        assert!(result.success);
        let details = result.details.unwrap_or_default();
        assert!(details.contains(&"Applied m20251201_000001_create_societe_table".to_string()));
        assert!(details.iter().any(|line| line.starts_with("Seeded ")));
        assert!(again.success);
        assert!(again.details.is_none());
        let report = service.integrity(SHARED_DATABASE, &shared_tables()).await.unwrap();
        assert_eq!(report.summary.ok, 5);
        assert_eq!(report.summary.extra, 0);
        assert!(ParameterService::new(&test.state.db)
            .get_bool("maintenance_mode")
            .await
            .unwrap()
            .is_some());

        Ok(())
    }

    #[tokio::test]
    async fn reports_connection_version() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let service = DatabaseService::new(&test.state.db);

        let status = service.connection().await;

        assert!(status.connected);
        assert!(status.version.is_some());

        Ok(())
    }
}
