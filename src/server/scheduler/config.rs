/// Cron expression of the rate limiter purge, every 5 minutes
pub const RATE_LIMIT_PURGE_CRON: &str = "0 */5 * * * *";
