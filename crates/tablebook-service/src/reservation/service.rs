//! Reservation service definition and the transactional lock manager.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use tablebook_core::config::reservation::ReservationConfig;
use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_core::traits::NotificationDispatcher;
use tablebook_database::repositories::{
    ReservationRepository, RestaurantRepository, TimeSlotRepository,
};
use tablebook_entity::reservation::{NewHold, Reservation};

use crate::availability::slot_open;
use crate::context::RequestContext;

/// A validated request to lock a slot.
///
/// The transport boundary parses and validates raw input before the
/// engine sees it; everything here is already typed.
#[derive(Debug, Clone)]
pub struct LockSlotRequest {
    /// The customer locking the slot.
    pub user_id: Uuid,
    /// The restaurant being booked.
    pub restaurant_id: Uuid,
    /// The slot to lock.
    pub time_slot_id: Uuid,
    /// Requested calendar date.
    pub date: NaiveDate,
    /// Party size.
    pub guests_count: i32,
}

/// The reservation engine.
///
/// Owns the only transaction boundary in the system: `lock_slot` runs
/// its five steps under a single transaction with pessimistic row
/// locks, serializing concurrent attempts on the same slot and by the
/// same user. Everything else is a single committed write per
/// transition.
#[derive(Clone)]
pub struct ReservationService {
    /// Pool used to open the lock transaction.
    pub(crate) pool: PgPool,
    /// Reservation repository.
    pub(crate) reservations: Arc<ReservationRepository>,
    /// Time slot repository.
    pub(crate) slots: Arc<TimeSlotRepository>,
    /// Restaurant repository.
    pub(crate) restaurants: Arc<RestaurantRepository>,
    /// Outbound notification dispatcher.
    pub(crate) dispatcher: Arc<dyn NotificationDispatcher>,
    /// Engine configuration (hold duration, staleness threshold).
    pub(crate) config: ReservationConfig,
}

impl fmt::Debug for ReservationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservationService")
            .field("config", &self.config)
            .finish()
    }
}

impl ReservationService {
    /// Creates a new reservation service.
    pub fn new(
        pool: PgPool,
        reservations: Arc<ReservationRepository>,
        slots: Arc<TimeSlotRepository>,
        restaurants: Arc<RestaurantRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        config: ReservationConfig,
    ) -> Self {
        Self {
            pool,
            reservations,
            slots,
            restaurants,
            dispatcher,
            config,
        }
    }

    /// Lock a slot for a user, creating a time-boxed hold.
    ///
    /// Returns `Ok(None)` when the slot filled up between the caller's
    /// availability check and the lock ("try a different slot", not a
    /// failure). Fails with `Conflict` when the user already has an
    /// active booking at the restaurant, and with `Unavailable` when
    /// the restaurant is not reservable or the slot is missing or
    /// inactive.
    pub async fn lock_slot(
        &self,
        ctx: &RequestContext,
        request: LockSlotRequest,
    ) -> AppResult<Option<Reservation>> {
        if request.guests_count < 1 {
            return Err(AppError::validation("guests_count must be at least 1"));
        }

        let restaurant = self
            .restaurants
            .find_by_id(request.restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant not found"))?;

        if !restaurant.accepts_bookings() {
            return Err(AppError::unavailable(
                "Restaurant is not accepting reservations currently",
            ));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin lock transaction", e)
        })?;

        // Step 1: lock the user's reservations at this restaurant and
        // reject if any still blocks a new booking. An advisory lock on
        // the (user, restaurant) pair serializes concurrent attempts by
        // the same user, including a first-time booker with no rows.
        let has_active = self
            .reservations
            .lock_user_active(&mut *tx, request.user_id, request.restaurant_id, request.date)
            .await?;

        if has_active {
            // Dropping the transaction rolls it back.
            return Err(AppError::conflict(
                "You already have an active booking at this restaurant. \
                 Complete or cancel it before booking another.",
            ));
        }

        // Step 2: lock the slot row. Concurrent lock attempts on the
        // same slot queue up here.
        let Some(slot) = self.slots.lock_active(&mut *tx, request.time_slot_id).await? else {
            return Err(AppError::unavailable(
                "Selected time slot is no longer available or inactive",
            ));
        };

        if slot.restaurant_id != request.restaurant_id {
            return Err(AppError::unavailable(
                "Selected time slot is no longer available or inactive",
            ));
        }

        // Step 3: re-check capacity under the held lock. The count
        // observes every competitor that committed before us.
        let active = self
            .reservations
            .count_active_for_slot_locked(&mut *tx, slot.id, request.date)
            .await?;

        let now = Utc::now();
        if !slot_open(&slot, request.date, active, now) {
            info!(
                trace_id = %ctx.trace_id,
                time_slot_id = %slot.id,
                date = %request.date,
                active,
                "Slot filled up during lock attempt"
            );
            return Ok(None);
        }

        // Step 4: create the hold.
        let hold = NewHold {
            user_id: request.user_id,
            restaurant_id: request.restaurant_id,
            time_slot_id: slot.id,
            reservation_date: request.date,
            reservation_time: slot.start_time,
            guests_count: request.guests_count,
            locked_until: now + Duration::minutes(self.config.hold_minutes),
        };
        let reservation = self.reservations.create_hold(&mut *tx, &hold).await?;

        // Step 5: commit, releasing both locks.
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit lock transaction", e)
        })?;

        info!(
            trace_id = %ctx.trace_id,
            reservation_id = %reservation.id,
            user_id = %request.user_id,
            time_slot_id = %slot.id,
            date = %request.date,
            locked_until = %hold.locked_until,
            "Slot locked"
        );

        Ok(Some(reservation))
    }

    /// Dispatch an event, never letting delivery problems surface.
    pub(crate) async fn notify(&self, ctx: &RequestContext, event: tablebook_core::events::ReservationEvent) {
        let reservation_id = event.reservation_id();
        self.dispatcher.dispatch(event).await;
        tracing::debug!(
            trace_id = %ctx.trace_id,
            reservation_id = %reservation_id,
            "Notification dispatched"
        );
    }

    /// Warn-and-continue helper for the opportunistic sweep.
    pub(crate) fn log_sweep_failure(ctx: &RequestContext, err: &AppError) {
        warn!(
            trace_id = %ctx.trace_id,
            error = %err,
            "Opportunistic lock cleanup failed; continuing"
        );
    }
}
