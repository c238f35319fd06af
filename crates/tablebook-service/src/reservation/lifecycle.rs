//! Lifecycle transitions: completion, cancellation, owner decisions,
//! and the user-facing listing.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::events::ReservationEvent;
use tablebook_core::result::AppResult;
use tablebook_core::types::pagination::{PageRequest, PageResponse};
use tablebook_entity::reservation::{CompletionDetails, Reservation, ReservationStatus};

use crate::context::RequestContext;

use super::service::ReservationService;

impl ReservationService {
    /// Complete a hold into a real reservation.
    ///
    /// Returns `Ok(None)` when the hold expired before completion; the
    /// reservation is canceled as a side effect and the caller should
    /// start over. With `auto_accept` the reservation lands directly in
    /// `accepted`, otherwise in `pending` awaiting the owner.
    pub async fn complete_reservation(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        reservation_id: Uuid,
        details: CompletionDetails,
    ) -> AppResult<Option<Reservation>> {
        let reservation = self
            .reservations
            .find_by_id_for_user(reservation_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;

        if reservation.status != ReservationStatus::Hold {
            return Err(AppError::conflict(
                "Only a held reservation can be completed",
            ));
        }

        // The sweeper may not have run yet; if it wins this write the
        // hold is already canceled and the outcome is the same.
        if reservation.lock_expired(Utc::now()) {
            self.reservations
                .set_status(
                    reservation_id,
                    ReservationStatus::Canceled,
                    false,
                    ReservationStatus::Hold,
                )
                .await?;
            info!(
                trace_id = %ctx.trace_id,
                reservation_id = %reservation_id,
                "Hold expired before completion; canceled"
            );
            return Ok(None);
        }

        let restaurant = self
            .restaurants
            .find_by_id(reservation.restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant not found"))?;

        let status = if restaurant.auto_accept {
            ReservationStatus::Accepted
        } else {
            ReservationStatus::Pending
        };

        let Some(completed) = self
            .reservations
            .complete(reservation_id, &details, status)
            .await?
        else {
            // The sweeper canceled the hold between our read and this
            // write; treat it exactly like an expired hold.
            info!(
                trace_id = %ctx.trace_id,
                reservation_id = %reservation_id,
                "Hold was settled concurrently before completion"
            );
            return Ok(None);
        };

        info!(
            trace_id = %ctx.trace_id,
            reservation_id = %completed.id,
            status = %completed.status,
            "Reservation completed"
        );

        self.notify(
            ctx,
            ReservationEvent::Created {
                reservation_id: completed.id,
                restaurant_id: completed.restaurant_id,
                user_id: completed.user_id,
                reservation_date: completed.reservation_date,
                reservation_time: completed.reservation_time,
                guests_count: completed.guests_count,
                status: completed.status.to_string(),
            },
        )
        .await;

        Ok(Some(completed))
    }

    /// Cancel a reservation on behalf of its owner.
    ///
    /// Returns `Ok(false)` (a no-op, not an error) when the reservation
    /// is missing, terminal, or belongs to someone else.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        reservation_id: Uuid,
    ) -> AppResult<bool> {
        let canceled = self
            .reservations
            .cancel_for_user(reservation_id, user_id)
            .await?;

        if canceled {
            info!(
                trace_id = %ctx.trace_id,
                reservation_id = %reservation_id,
                user_id = %user_id,
                "Reservation canceled by customer"
            );
        }

        Ok(canceled)
    }

    /// Owner decision on a reservation.
    ///
    /// Owners may only set `accepted`, `rejected`, `canceled`, or
    /// `completed`, and only along a legal lifecycle edge; `completed`
    /// stamps `completed_at`. Notifies the customer.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        restaurant_id: Uuid,
        reservation_id: Uuid,
        new_status: ReservationStatus,
    ) -> AppResult<Reservation> {
        if !new_status.owner_settable() {
            return Err(AppError::validation(format!(
                "Status '{new_status}' cannot be set by a restaurant owner"
            )));
        }

        let reservation = self
            .reservations
            .find_by_id_for_restaurant(reservation_id, restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;

        if !reservation.status.can_transition_to(new_status) {
            return Err(AppError::conflict(format!(
                "Reservation in status '{}' cannot move to '{new_status}'",
                reservation.status
            )));
        }

        let stamp_completed = new_status == ReservationStatus::Completed;
        let updated = self
            .reservations
            .set_status(reservation_id, new_status, stamp_completed, reservation.status)
            .await?
            .ok_or_else(|| {
                AppError::conflict("Reservation status changed concurrently; reload and retry")
            })?;

        info!(
            trace_id = %ctx.trace_id,
            reservation_id = %updated.id,
            status = %updated.status,
            "Reservation status updated by owner"
        );

        self.notify(
            ctx,
            ReservationEvent::StatusUpdated {
                reservation_id: updated.id,
                restaurant_id: updated.restaurant_id,
                user_id: updated.user_id,
                status: updated.status.to_string(),
            },
        )
        .await;

        Ok(updated)
    }

    /// Page through a user's reservations, newest visit first.
    ///
    /// Runs the expired-lock sweep opportunistically first; a sweep
    /// failure is logged and never blocks the read.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        if let Err(err) = self.cleanup_locks(ctx).await {
            Self::log_sweep_failure(ctx, &err);
        }

        self.reservations.find_page_for_user(user_id, page).await
    }

    /// Fetch a reservation scoped to its owner.
    pub async fn get_for_user(
        &self,
        _ctx: &RequestContext,
        user_id: Uuid,
        reservation_id: Uuid,
    ) -> AppResult<Reservation> {
        self.reservations
            .find_by_id_for_user(reservation_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))
    }
}
