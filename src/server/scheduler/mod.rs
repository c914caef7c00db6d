//! Cron scheduler for periodic maintenance.
//!
//! Registers the rate limiter purge and, when `BACKUP_CRON` is configured, a backup of the
//! shared database. Jobs receive a clone of the application state.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, model::app::AppState};

pub mod config;
pub mod jobs;

pub struct Scheduler {
    state: AppState,
    sched: JobScheduler,
}

impl Scheduler {
    pub async fn new(state: AppState) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { state, sched })
    }

    /// Registers the jobs and starts the scheduler
    pub async fn start(mut self, backup_cron: Option<&str>) -> Result<(), Error> {
        self.schedule_job(
            config::RATE_LIMIT_PURGE_CRON,
            "rate limit purge",
            jobs::purge_rate_limits,
        )
        .await?;

        match backup_cron {
            Some(cron) => {
                self.schedule_job(cron, "shared database backup", jobs::backup_shared_database)
                    .await?
            }
            None => tracing::info!("BACKUP_CRON not set, scheduled backups disabled"),
        }

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules `function` on `cron` (six fields, seconds first)
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(AppState) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let state = self.state.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let state = state.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(state).await {
                        Ok(count) => tracing::debug!("{} handled {} item(s)", name, count),
                        Err(e) => tracing::error!("Error running {}: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
