//! Owner-facing time slot management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_database::repositories::{ReservationRepository, TimeSlotRepository};
use tablebook_entity::time_slot::{NewTimeSlot, TimeSlot, TimeSlotUpdate};

use crate::context::RequestContext;

/// Owner management of the recurring slot registry.
#[derive(Debug, Clone)]
pub struct TimeSlotService {
    /// Time slot repository.
    slots: Arc<TimeSlotRepository>,
    /// Reservation repository, for reference checks.
    reservations: Arc<ReservationRepository>,
}

impl TimeSlotService {
    /// Creates a new time slot service.
    pub fn new(slots: Arc<TimeSlotRepository>, reservations: Arc<ReservationRepository>) -> Self {
        Self {
            slots,
            reservations,
        }
    }

    /// Create a new slot for a restaurant.
    pub async fn create_slot(
        &self,
        ctx: &RequestContext,
        slot: NewTimeSlot,
    ) -> AppResult<TimeSlot> {
        if slot.start_time >= slot.end_time {
            return Err(AppError::validation(
                "Slot start time must be before its end time",
            ));
        }
        if slot.capacity < 1 {
            return Err(AppError::validation("Slot capacity must be at least 1"));
        }

        let created = self.slots.create(&slot).await?;
        info!(
            trace_id = %ctx.trace_id,
            time_slot_id = %created.id,
            restaurant_id = %created.restaurant_id,
            "Time slot created"
        );
        Ok(created)
    }

    /// Edit a slot.
    ///
    /// Capacity and the active flag are always editable; the seating
    /// window is frozen once any reservation references the slot.
    pub async fn update_slot(
        &self,
        ctx: &RequestContext,
        time_slot_id: Uuid,
        update: TimeSlotUpdate,
    ) -> AppResult<TimeSlot> {
        let slot = self
            .slots
            .find_by_id(time_slot_id)
            .await?
            .ok_or_else(|| AppError::not_found("Time slot not found"))?;

        if update.changes_window() && self.reservations.any_for_slot(time_slot_id).await? {
            return Err(AppError::conflict(
                "Slot times cannot change while reservations reference the slot",
            ));
        }

        if let Some(capacity) = update.capacity {
            if capacity < 1 {
                return Err(AppError::validation("Slot capacity must be at least 1"));
            }
        }

        let start = update.start_time.unwrap_or(slot.start_time);
        let end = update.end_time.unwrap_or(slot.end_time);
        if start >= end {
            return Err(AppError::validation(
                "Slot start time must be before its end time",
            ));
        }

        let updated = self.slots.update(time_slot_id, &update).await?;
        info!(
            trace_id = %ctx.trace_id,
            time_slot_id = %updated.id,
            "Time slot updated"
        );
        Ok(updated)
    }

    /// Remove a slot.
    ///
    /// Slots that reservations reference are never hard-deleted; they
    /// are deactivated instead. Returns whether the row was actually
    /// deleted.
    pub async fn remove_slot(&self, ctx: &RequestContext, time_slot_id: Uuid) -> AppResult<bool> {
        let slot = self
            .slots
            .find_by_id(time_slot_id)
            .await?
            .ok_or_else(|| AppError::not_found("Time slot not found"))?;

        if self.reservations.any_for_slot(slot.id).await? {
            self.slots.deactivate(slot.id).await?;
            info!(
                trace_id = %ctx.trace_id,
                time_slot_id = %slot.id,
                "Referenced time slot deactivated instead of deleted"
            );
            return Ok(false);
        }

        self.slots.delete(slot.id).await?;
        info!(
            trace_id = %ctx.trace_id,
            time_slot_id = %slot.id,
            "Time slot deleted"
        );
        Ok(true)
    }

    /// List every slot of a restaurant, earliest first.
    pub async fn list_slots(&self, restaurant_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        self.slots.find_by_restaurant(restaurant_id).await
    }
}
