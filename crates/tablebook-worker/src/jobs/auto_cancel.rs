//! Stale-pending auto-cancel job.

use std::sync::Arc;

use tracing::{error, info};

use tablebook_service::{RequestContext, ReservationService};

/// Cancels pending reservations the restaurant never decided on.
#[derive(Debug)]
pub struct AutoCancelPendingJob {
    /// The reservation engine.
    service: Arc<ReservationService>,
}

impl AutoCancelPendingJob {
    /// Creates a new auto-cancel job.
    pub fn new(service: Arc<ReservationService>) -> Self {
        Self { service }
    }

    /// Execute one sweep. Each run gets its own trace ID.
    pub async fn run(&self) {
        let ctx = RequestContext::system();
        info!(trace_id = %ctx.trace_id, "Stale-pending sweep running");

        match self.service.auto_cancel_pending(&ctx).await {
            Ok(canceled) => {
                info!(
                    trace_id = %ctx.trace_id,
                    canceled_count = canceled,
                    "Stale-pending sweep finished"
                );
            }
            Err(e) => {
                error!(
                    trace_id = %ctx.trace_id,
                    error = %e,
                    "Stale-pending sweep failed; next tick will retry"
                );
            }
        }
    }
}
