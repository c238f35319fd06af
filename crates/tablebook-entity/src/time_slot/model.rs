//! Time slot entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recurring bookable time window at a restaurant.
///
/// Slots recur daily; a reservation pins a slot to a concrete calendar
/// date. `capacity` is the number of tables that may be simultaneously
/// reserved for the slot on any one date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: Uuid,
    /// The restaurant this slot belongs to.
    pub restaurant_id: Uuid,
    /// Seating window start.
    pub start_time: NaiveTime,
    /// Seating window end.
    pub end_time: NaiveTime,
    /// Maximum concurrent reservations per date.
    pub capacity: i32,
    /// Whether the slot is currently bookable.
    pub is_active: bool,
    /// When the slot was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Whether the slot's start time has already passed for `date`.
    ///
    /// Only a same-day booking can be "in the past"; future dates are
    /// always ahead of the slot's recurring start time.
    pub fn start_passed(&self, date: NaiveDate, now: DateTime<Utc>) -> bool {
        date == now.date_naive() && self.start_time <= now.time()
    }
}

/// Data required to create a new time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeSlot {
    /// The restaurant the slot belongs to.
    pub restaurant_id: Uuid,
    /// Seating window start.
    pub start_time: NaiveTime,
    /// Seating window end.
    pub end_time: NaiveTime,
    /// Maximum concurrent reservations per date.
    pub capacity: i32,
}

/// Owner edits to an existing slot.
///
/// Start and end times may only change while no reservation references
/// the slot; capacity and the active flag are always editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSlotUpdate {
    /// New seating window start.
    pub start_time: Option<NaiveTime>,
    /// New seating window end.
    pub end_time: Option<NaiveTime>,
    /// New capacity.
    pub capacity: Option<i32>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl TimeSlotUpdate {
    /// Whether this update touches the seating window.
    pub fn changes_window(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }
}
