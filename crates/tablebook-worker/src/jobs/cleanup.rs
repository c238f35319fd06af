//! Expired-lock cleanup job.

use std::sync::Arc;

use tracing::{error, info};

use tablebook_service::{RequestContext, ReservationService};

/// Releases capacity held by expired locks.
///
/// Safe to re-run at any frequency; the underlying sweep is idempotent.
#[derive(Debug)]
pub struct CleanupExpiredLocksJob {
    /// The reservation engine.
    service: Arc<ReservationService>,
}

impl CleanupExpiredLocksJob {
    /// Creates a new cleanup job.
    pub fn new(service: Arc<ReservationService>) -> Self {
        Self { service }
    }

    /// Execute one sweep. Each run gets its own trace ID.
    pub async fn run(&self) {
        let ctx = RequestContext::system();

        match self.service.cleanup_locks(&ctx).await {
            Ok(cleaned) if cleaned > 0 => {
                info!(
                    trace_id = %ctx.trace_id,
                    cleaned_count = cleaned,
                    "Expired-lock sweep finished"
                );
            }
            Ok(_) => {}
            Err(e) => {
                error!(
                    trace_id = %ctx.trace_id,
                    error = %e,
                    "Expired-lock sweep failed; next tick will retry"
                );
            }
        }
    }
}
