//! Maintenance jobs run by the scheduler. Each returns the number of items it handled.

use crate::server::{error::Error, model::app::AppState, service::backup::BackupService};

/// Dumps the shared database; an unsuccessful dump is logged by the backup service and
/// counted as zero
pub async fn backup_shared_database(state: AppState) -> Result<usize, Error> {
    let result = BackupService::new(&state.db, &state.backup, &state.breakers, &state.tenants)
        .backup(None)
        .await?;

    Ok(usize::from(result.success))
}

/// Drops rate limiter entries whose windows have expired
pub async fn purge_rate_limits(state: AppState) -> Result<usize, Error> {
    Ok(state.rate_limiter.purge())
}

#[cfg(test)]
mod tests {
    use topsteel_test_utils::prelude::*;

    use super::*;
    use crate::server::{service::backup::BackupConfig, util::test::app_state};

    /// Expect a failing pg_dump to be reported as zero backups rather than an error
    #[tokio::test]
    async fn backup_failure_counts_zero() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let mut state = app_state(&test).await;
        state.backup = std::sync::Arc::new(BackupConfig {
            dir: std::env::temp_dir().join(format!("topsteel-job-{}", rand::random::<u64>())),
            pg_dump_path: "/nonexistent/pg_dump".to_string(),
            psql_path: "/nonexistent/psql".to_string(),
            database_url: "postgres://localhost/topsteel".to_string(),
        });

        let count = backup_shared_database(state).await.unwrap();

        assert_eq!(count, 0);

        Ok(())
    }

    /// Expect nothing to purge on a fresh limiter
    #[tokio::test]
    async fn purge_on_empty_limiter() -> Result<(), TestError> {
        let test = TestSetup::new().await?;
        let state = app_state(&test).await;

        assert_eq!(purge_rate_limits(state).await.unwrap(), 0);

        Ok(())
    }
}
