use std::{net::IpAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::server::{error::config::ConfigError, resilience::rate_limit::RateLimitConfig};

/// Placeholder substituted with the lower-cased societe code in tenant database URLs
pub const TENANT_PLACEHOLDER: &str = "{tenant}";

const MIN_JWT_SECRET_LEN: usize = 32;

pub struct Config {
    pub database_url: String,
    pub tenant_database_url_template: String,
    pub jwt_secret: String,
    pub bind_address: String,
    pub valkey_url: Option<String>,
    pub app_name: String,
    pub backup_dir: PathBuf,
    pub pg_dump_path: String,
    pub psql_path: String,
    pub backup_cron: Option<String>,
    pub rate_limit: RateLimitConfig,
    /// Addresses of reverse proxies allowed to set `X-Forwarded-For`
    pub trusted_proxies: Vec<IpAddr>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };
        let optional = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let tenant_database_url_template = required("TENANT_DATABASE_URL_TEMPLATE")?;
        if !tenant_database_url_template.contains(TENANT_PLACEHOLDER) {
            return Err(ConfigError::MissingTenantPlaceholder);
        }

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret {
                min_len: MIN_JWT_SECRET_LEN,
            });
        }

        let window_secs: u64 =
            parse_or(optional("RATE_LIMIT_WINDOW_SECS"), "RATE_LIMIT_WINDOW_SECS", 60)?;
        let max_requests: u32 =
            parse_or(optional("RATE_LIMIT_MAX_REQUESTS"), "RATE_LIMIT_MAX_REQUESTS", 100)?;
        if window_secs == 0 || max_requests == 0 {
            return Err(ConfigError::EmptyRateLimit);
        }

        let trusted_proxies = optional("TRUSTED_PROXIES")
            .map(|list| parse_list(&list, "TRUSTED_PROXIES"))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            tenant_database_url_template,
            jwt_secret,
            bind_address: optional("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3002".to_string()),
            valkey_url: optional("VALKEY_URL"),
            app_name: optional("APP_NAME").unwrap_or_else(|| "topsteel".to_string()),
            backup_dir: PathBuf::from(
                optional("BACKUP_DIR").unwrap_or_else(|| "./backups".to_string()),
            ),
            pg_dump_path: optional("PG_DUMP_PATH").unwrap_or_else(|| "pg_dump".to_string()),
            psql_path: optional("PSQL_PATH").unwrap_or_else(|| "psql".to_string()),
            backup_cron: optional("BACKUP_CRON"),
            rate_limit: RateLimitConfig {
                window: Duration::from_secs(window_secs),
                max_requests,
            },
            trusted_proxies,
        })
    }
}

/// Parses a comma-separated list, ignoring empty entries
fn parse_list<T: FromStr>(list: &str, var: &str) -> Result<Vec<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse().map_err(|e: T::Err| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: format!("{}: {}", entry, e),
            })
        })
        .collect()
}

fn parse_or<T: FromStr>(value: Option<String>, var: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
    }
}
