//! Cron scheduler for the periodic sweeps.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use tablebook_core::config::worker::WorkerConfig;
use tablebook_core::error::AppError;
use tablebook_service::ReservationService;

use crate::jobs::{AutoCancelPendingJob, CleanupExpiredLocksJob};

/// Cron-based scheduler for the reservation sweeps.
pub struct CronScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// The reservation engine the jobs run against.
    service: Arc<ReservationService>,
    /// Cron expressions for the sweeps.
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("config", &self.config)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(
        service: Arc<ReservationService>,
        config: WorkerConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            service,
            config,
        })
    }

    /// Register both sweeps.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_lock_cleanup().await?;
        self.register_auto_cancel().await?;

        tracing::info!("All scheduled sweeps registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Expired-lock cleanup, every 5 minutes by default.
    async fn register_lock_cleanup(&self) -> Result<(), AppError> {
        let job = Arc::new(CleanupExpiredLocksJob::new(Arc::clone(&self.service)));
        let cron_job = CronJob::new_async(self.config.lock_cleanup_cron.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                job.run().await;
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create lock_cleanup schedule: {}", e))
        })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add lock_cleanup schedule: {}", e))
        })?;

        tracing::info!(cron = %self.config.lock_cleanup_cron, "Registered: lock_cleanup");
        Ok(())
    }

    /// Stale-pending auto-cancel, hourly by default.
    async fn register_auto_cancel(&self) -> Result<(), AppError> {
        let job = Arc::new(AutoCancelPendingJob::new(Arc::clone(&self.service)));
        let cron_job = CronJob::new_async(self.config.auto_cancel_cron.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                job.run().await;
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create auto_cancel schedule: {}", e))
        })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add auto_cancel schedule: {}", e))
        })?;

        tracing::info!(cron = %self.config.auto_cancel_cron, "Registered: auto_cancel_pending");
        Ok(())
    }
}
