//! Reservation-related domain events.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted by the reservation lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReservationEvent {
    /// A hold was completed into a real reservation. Owner-facing.
    Created {
        /// The reservation ID.
        reservation_id: Uuid,
        /// The restaurant being booked.
        restaurant_id: Uuid,
        /// The customer who booked.
        user_id: Uuid,
        /// The calendar date of the reservation.
        reservation_date: NaiveDate,
        /// The slot's start time.
        reservation_time: NaiveTime,
        /// Party size.
        guests_count: i32,
        /// Status after completion (`accepted` or `pending`).
        status: String,
    },
    /// A reservation changed status (owner decision or sweeper
    /// cancellation). Customer-facing.
    StatusUpdated {
        /// The reservation ID.
        reservation_id: Uuid,
        /// The restaurant being booked.
        restaurant_id: Uuid,
        /// The customer who booked.
        user_id: Uuid,
        /// The new status.
        status: String,
    },
}

impl ReservationEvent {
    /// The reservation this event concerns.
    pub fn reservation_id(&self) -> Uuid {
        match self {
            Self::Created { reservation_id, .. } => *reservation_id,
            Self::StatusUpdated { reservation_id, .. } => *reservation_id,
        }
    }
}
