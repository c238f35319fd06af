//! Reservation entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::reservation::status::ReservationStatus;

/// A customer's reservation at a restaurant.
///
/// Created in `hold` status by the lock manager with capacity reserved
/// until `locked_until`; completed by the customer into `pending` or
/// `accepted`; then driven to a terminal state by the owner or the
/// sweeper.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: Uuid,
    /// The customer who booked.
    pub user_id: Uuid,
    /// The restaurant being booked.
    pub restaurant_id: Uuid,
    /// The recurring time slot this reservation occupies.
    pub time_slot_id: Uuid,
    /// The calendar date of the visit (distinct from the slot's
    /// recurring time-of-day).
    pub reservation_date: NaiveDate,
    /// The slot's start time, copied at lock time.
    pub reservation_time: NaiveTime,
    /// Party size.
    pub guests_count: i32,
    /// Occasion free text (birthday, anniversary, ...).
    pub occasion: Option<String>,
    /// Special request free text.
    pub special_request: Option<String>,
    /// Dietary preference free text.
    pub dietary_preferences: Option<String>,
    /// Whether the customer opted into the newsletter at completion.
    pub subscribe_newsletter: bool,
    /// Current lifecycle status.
    pub status: ReservationStatus,
    /// Hold expiry. Only set while status = `hold`.
    pub locked_until: Option<DateTime<Utc>>,
    /// When the customer completed the hold into a real reservation,
    /// or when the owner marked the visit completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the row was created (lock time).
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether this is a hold whose lock has already expired at `now`.
    pub fn lock_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Hold
            && self.locked_until.is_some_and(|until| until <= now)
    }

    /// Whether this reservation still counts toward its slot's capacity.
    ///
    /// Accepted, pending, and completed reservations always consume a
    /// table; a hold only does while its lock is unexpired.
    pub fn consumes_capacity(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            ReservationStatus::Accepted
            | ReservationStatus::Pending
            | ReservationStatus::Completed => true,
            ReservationStatus::Hold => self.locked_until.is_some_and(|until| until > now),
            ReservationStatus::Rejected | ReservationStatus::Canceled => false,
        }
    }

    /// Whether this reservation blocks the same user from opening
    /// another booking at the same restaurant for `date`.
    pub fn blocks_new_booking(&self, date: NaiveDate, now: DateTime<Utc>) -> bool {
        match self.status {
            ReservationStatus::Pending => true,
            ReservationStatus::Hold => self.locked_until.is_some_and(|until| until > now),
            ReservationStatus::Accepted => self.reservation_date == date,
            _ => false,
        }
    }
}

/// Data required to create a new hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHold {
    /// The customer locking the slot.
    pub user_id: Uuid,
    /// The restaurant being booked.
    pub restaurant_id: Uuid,
    /// The slot being locked.
    pub time_slot_id: Uuid,
    /// Requested calendar date.
    pub reservation_date: NaiveDate,
    /// The slot's start time.
    pub reservation_time: NaiveTime,
    /// Party size.
    pub guests_count: i32,
    /// When the hold expires.
    pub locked_until: DateTime<Utc>,
}

/// Customer-supplied details merged into a hold at completion time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionDetails {
    /// Occasion free text.
    pub occasion: Option<String>,
    /// Special request free text.
    pub special_request: Option<String>,
    /// Dietary preference free text.
    pub dietary_preferences: Option<String>,
    /// Newsletter opt-in.
    pub subscribe_newsletter: bool,
}
