use fred::prelude::{ClientLike, Config as RedisConfig, Pool};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::server::{
    config::Config,
    error::Error,
    model::{app::AppState, auth::JwtKeys},
    resilience::rate_limit::RateLimiter,
    service::{backup::BackupConfig, parameter::ParameterService},
};

/// Connect to the shared database, run migrations and seed default parameters
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;

    let seeded = ParameterService::new(&db).seed_defaults().await?;
    if seeded > 0 {
        tracing::info!("Seeded {} default system parameters", seeded);
    }

    Ok(db)
}

/// Connect to Valkey/Redis for the shared rate limiter backend
pub async fn connect_to_valkey(url: &str) -> Result<Pool, Error> {
    let config = RedisConfig::from_url(url)?;
    let pool = Pool::new(config, None, None, None, 6)?;

    pool.connect();
    pool.wait_for_connect().await?;

    Ok(pool)
}

/// Rate limiter on Valkey when `VALKEY_URL` is set, in memory otherwise
pub async fn build_rate_limiter(config: &Config) -> Result<RateLimiter, Error> {
    match &config.valkey_url {
        Some(url) => {
            let pool = connect_to_valkey(url).await?;
            tracing::info!("Rate limiter using Valkey");

            Ok(RateLimiter::new_redis(
                pool,
                config.rate_limit,
                config.app_name.clone(),
            ))
        }
        None => {
            tracing::info!("VALKEY_URL not set, rate limiter kept in memory");

            Ok(RateLimiter::new_memory(
                config.rate_limit,
                config.app_name.clone(),
            ))
        }
    }
}

pub async fn build_state(config: &Config, db: DatabaseConnection) -> Result<AppState, Error> {
    let rate_limiter = build_rate_limiter(config).await?;

    let state = AppState::new(
        db,
        &config.tenant_database_url_template,
        rate_limiter,
        JwtKeys::new(&config.jwt_secret),
        BackupConfig::from(config),
    )?;

    Ok(state.with_trusted_proxies(config.trusted_proxies.clone()))
}
