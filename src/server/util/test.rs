use std::time::Duration;

use topsteel_test_utils::prelude::*;

use crate::server::{
    model::{app::AppState, auth::JwtKeys},
    resilience::rate_limit::{RateLimitConfig, RateLimiter},
    service::backup::BackupConfig,
};

/// Application state over the databases of `test`, with the tenant database registered
/// under [`TEST_SOCIETE_CODE`]
pub async fn app_state(test: &TestSetup) -> AppState {
    let rate_limiter = RateLimiter::new_memory(
        RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests: 100,
        },
        "topsteel-test",
    );
    let backup = BackupConfig {
        dir: std::env::temp_dir().join("topsteel-test-backups"),
        pg_dump_path: "pg_dump".to_string(),
        psql_path: "psql".to_string(),
        database_url: "sqlite::memory:".to_string(),
    };

    let state = AppState::new(
        test.state.db.clone(),
        "sqlite:///nonexistent/topsteel/{tenant}.db",
        rate_limiter,
        JwtKeys::new(TEST_JWT_SECRET),
        backup,
    )
    .unwrap();
    state
        .tenants
        .insert(TEST_SOCIETE_CODE, test.state.tenant_db.clone())
        .await;

    state
}
