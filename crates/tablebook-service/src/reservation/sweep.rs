//! Expiry sweeps: expired-lock cleanup and stale-pending auto-cancel.

use chrono::{Duration, Utc};
use tracing::info;

use tablebook_core::events::ReservationEvent;
use tablebook_core::result::AppResult;
use tablebook_entity::reservation::ReservationStatus;

use crate::context::RequestContext;

use super::service::ReservationService;

impl ReservationService {
    /// Cancel every hold whose lock has expired.
    ///
    /// Idempotent: a second run over an already-swept set changes
    /// nothing. Invoked inline before user listings and every few
    /// minutes by the scheduler; returns the number of holds released.
    pub async fn cleanup_locks(&self, ctx: &RequestContext) -> AppResult<u64> {
        let cleaned = self.reservations.cancel_expired_holds(Utc::now()).await?;

        if cleaned > 0 {
            info!(
                trace_id = %ctx.trace_id,
                cleaned_count = cleaned,
                "Cleaned up expired reservation locks"
            );
        }

        Ok(cleaned)
    }

    /// Cancel pending reservations the owner never decided on.
    ///
    /// A pending reservation goes stale once it was created more than
    /// the configured threshold ago, or once its reservation date/time
    /// already lies in the past. Each cancellation notifies the
    /// customer; returns the number canceled.
    pub async fn auto_cancel_pending(&self, ctx: &RequestContext) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::hours(self.config.pending_max_age_hours);
        let stale = self.reservations.find_stale_pending(cutoff).await?;

        let mut canceled = 0u64;
        for reservation in stale {
            let swept = self
                .reservations
                .set_status(
                    reservation.id,
                    ReservationStatus::Canceled,
                    false,
                    ReservationStatus::Pending,
                )
                .await?;

            // The owner decided between the scan and this write; their
            // transition stands and no cancellation happened.
            if swept.is_none() {
                continue;
            }
            canceled += 1;

            info!(
                trace_id = %ctx.trace_id,
                reservation_id = %reservation.id,
                user_id = %reservation.user_id,
                restaurant_id = %reservation.restaurant_id,
                reason = "No response from restaurant",
                "Auto-canceled pending reservation"
            );

            self.notify(
                ctx,
                ReservationEvent::StatusUpdated {
                    reservation_id: reservation.id,
                    restaurant_id: reservation.restaurant_id,
                    user_id: reservation.user_id,
                    status: ReservationStatus::Canceled.to_string(),
                },
            )
            .await;
        }

        Ok(canceled)
    }
}
