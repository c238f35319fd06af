//! Read-only availability computation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tablebook_core::result::AppResult;
use tablebook_database::repositories::{ReservationRepository, TimeSlotRepository};
use tablebook_entity::time_slot::TimeSlot;

/// The availability decision, shared with the lock manager.
///
/// A slot is open for `date` when it is active, its start time has not
/// yet passed (same-day bookings only), and `active_count` reservations
/// consume strictly less than its capacity. Pure so the lock manager
/// can re-evaluate it under a held row lock with a fresh count.
pub fn slot_open(slot: &TimeSlot, date: NaiveDate, active_count: i64, now: DateTime<Utc>) -> bool {
    slot.is_active && !slot.start_passed(date, now) && active_count < i64::from(slot.capacity)
}

/// One slot of a restaurant with its computed availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailability {
    /// The slot ID.
    pub time_slot_id: Uuid,
    /// Seating window start.
    pub start_time: NaiveTime,
    /// Seating window end.
    pub end_time: NaiveTime,
    /// Whether the slot can still be booked for the requested date.
    pub is_available: bool,
}

/// Read-only availability queries.
///
/// Side-effect free; atomicity, when needed, is the caller's concern
/// (the lock manager re-runs the same decision inside its transaction).
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    /// Time slot repository.
    slots: Arc<TimeSlotRepository>,
    /// Reservation repository.
    reservations: Arc<ReservationRepository>,
}

impl AvailabilityService {
    /// Creates a new availability service.
    pub fn new(slots: Arc<TimeSlotRepository>, reservations: Arc<ReservationRepository>) -> Self {
        Self {
            slots,
            reservations,
        }
    }

    /// Whether a slot can still be booked for `date`.
    ///
    /// A missing slot is simply not available, never an error.
    pub async fn is_available(&self, time_slot_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        let Some(slot) = self.slots.find_by_id(time_slot_id).await? else {
            return Ok(false);
        };

        let active = self
            .reservations
            .count_active_for_slot(time_slot_id, date)
            .await?;

        Ok(slot_open(&slot, date, active, Utc::now()))
    }

    /// Every active slot of a restaurant with its availability for
    /// `date`, ordered by start time ascending.
    ///
    /// Counts are fetched in one grouped query; the result is a pure
    /// function of database state at call time.
    pub async fn available_slots(
        &self,
        restaurant_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<SlotAvailability>> {
        let slots = self.slots.find_active_by_restaurant(restaurant_id).await?;
        let counts: HashMap<Uuid, i64> = self
            .reservations
            .count_active_by_restaurant(restaurant_id, date)
            .await?
            .into_iter()
            .collect();

        let now = Utc::now();
        Ok(slots
            .into_iter()
            .map(|slot| {
                let active = counts.get(&slot.id).copied().unwrap_or(0);
                SlotAvailability {
                    time_slot_id: slot.id,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    is_available: slot_open(&slot, date, active, now),
                }
            })
            .collect())
    }
}
