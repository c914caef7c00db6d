use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

/// The two databases of a running instance: shared and one tenant's.
pub struct TestAppState {
    pub db: DatabaseConnection,
    pub tenant_db: DatabaseConnection,
}

pub struct TestSetup {
    pub state: TestAppState,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let db = Database::connect("sqlite::memory:").await?;
        let tenant_db = Database::connect("sqlite::memory:").await?;

        Ok(TestSetup {
            state: TestAppState { db, tenant_db },
        })
    }

    pub async fn with_tables(&self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        for stmt in stmts {
            self.state.db.execute(&stmt).await?;
        }

        Ok(())
    }

    pub async fn with_tenant_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.state.tenant_db.execute(&stmt).await?;
        }

        Ok(())
    }
}

/// Creates a [`TestSetup`] with the given entities' tables in the shared database.
#[macro_export]
macro_rules! test_setup_with_tables {
    // Pattern 1: No entities provided
    () => {{
        TestSetup::new().await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

/// Creates a [`TestSetup`] with the given entities' tables in the tenant database.
#[macro_export]
macro_rules! test_setup_with_tenant_tables {
    // Pattern 1: All tenant tables
    () => {{
        $crate::test_setup_with_tenant_tables!(
            entity::prelude::Client,
            entity::prelude::Projet,
            entity::prelude::Material,
            entity::prelude::MaterialMovement
        )
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tenant_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

/// Creates a [`TestSetup`] with every shared table and every tenant table.
#[macro_export]
macro_rules! test_setup_with_all_tables {
    () => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            setup
                .with_tables(vec![
                    schema.create_table_from_entity(entity::prelude::Societe),
                    schema.create_table_from_entity(entity::prelude::SystemParameter),
                    schema.create_table_from_entity(entity::prelude::MarketplaceModule),
                    schema.create_table_from_entity(entity::prelude::ModuleInstallation),
                    schema.create_table_from_entity(entity::prelude::ModuleRating),
                ])
                .await?;
            setup
                .with_tenant_tables(vec![
                    schema.create_table_from_entity(entity::prelude::Client),
                    schema.create_table_from_entity(entity::prelude::Projet),
                    schema.create_table_from_entity(entity::prelude::Material),
                    schema.create_table_from_entity(entity::prelude::MaterialMovement),
                ])
                .await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}
