//! Introspection of the live database schema, used by the integrity report.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement};

/// Bookkeeping table of sea-orm-migration, never part of the entity model
pub const MIGRATIONS_TABLE: &str = "seaql_migrations";

#[derive(Debug, FromQueryResult)]
struct TableName {
    table_name: String,
}

#[derive(Debug, FromQueryResult)]
struct ColumnName {
    column_name: String,
}

#[derive(Debug, FromQueryResult)]
struct ServerVersion {
    version: String,
}

pub struct SchemaRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SchemaRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// User tables of the database, sorted by name
    ///
    /// Internal tables (`sqlite_*`) and the migrations table are excluded.
    pub async fn list_tables(&self) -> Result<Vec<String>, DbErr> {
        let backend = self.db.get_database_backend();
        let sql = match backend {
            DbBackend::Sqlite => {
                "SELECT name AS table_name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'"
            }
            _ => {
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema = 'public' AND table_type = 'BASE TABLE'"
            }
        };

        let mut tables: Vec<String> =
            TableName::find_by_statement(Statement::from_string(backend, sql))
                .all(self.db)
                .await?
                .into_iter()
                .map(|row| row.table_name)
                .filter(|name| name != MIGRATIONS_TABLE)
                .collect();
        tables.sort();

        Ok(tables)
    }

    /// Column names of `table` in declaration order
    pub async fn list_columns(&self, table: &str) -> Result<Vec<String>, DbErr> {
        let backend = self.db.get_database_backend();
        let stmt = match backend {
            DbBackend::Sqlite => Statement::from_sql_and_values(
                backend,
                "SELECT name AS column_name FROM pragma_table_info(?) ORDER BY cid",
                [table.into()],
            ),
            _ => Statement::from_sql_and_values(
                backend,
                "SELECT column_name FROM information_schema.columns \
                 WHERE table_schema = 'public' AND table_name = $1 ORDER BY ordinal_position",
                [table.into()],
            ),
        };

        Ok(ColumnName::find_by_statement(stmt)
            .all(self.db)
            .await?
            .into_iter()
            .map(|row| row.column_name)
            .collect())
    }

    /// Version string reported by the database server
    pub async fn server_version(&self) -> Result<String, DbErr> {
        let backend = self.db.get_database_backend();
        let sql = match backend {
            DbBackend::Sqlite => "SELECT sqlite_version() AS version",
            _ => "SELECT version() AS version",
        };

        ServerVersion::find_by_statement(Statement::from_string(backend, sql))
            .one(self.db)
            .await?
            .map(|row| row.version)
            .ok_or_else(|| DbErr::RecordNotFound("server version".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use topsteel_test_utils::prelude::*;

    use super::SchemaRepository;

    /// Expect created tables to be listed in name order
    #[tokio::test]
    async fn lists_tables() -> Result<(), TestError> {
        let test = test_setup_with_tables!(
            entity::prelude::SystemParameter,
            entity::prelude::Societe
        )?;
        let repo = SchemaRepository::new(&test.state.db);

        let tables = repo.list_tables().await?;

        assert_eq!(tables, vec!["societe".to_string(), "system_parameter".to_string()]);

        Ok(())
    }

    /// Expect the columns of the societe table in declaration order
    #[tokio::test]
    async fn lists_columns() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::Societe)?;
        let repo = SchemaRepository::new(&test.state.db);

        let columns = repo.list_columns("societe").await?;

        assert_eq!(columns.first().map(String::as_str), Some("id"));
        assert!(columns.iter().any(|c| c == "database_name"));

        Ok(())
    }

    /// Expect no columns for a table that does not exist
    #[tokio::test]
    async fn lists_no_columns_for_missing_table() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;
        let repo = SchemaRepository::new(&test.state.db);

        assert!(repo.list_columns("client").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn reads_server_version() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;
        let repo = SchemaRepository::new(&test.state.db);

        assert!(!repo.server_version().await?.is_empty());

        Ok(())
    }
}
