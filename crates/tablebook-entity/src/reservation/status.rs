//! Reservation status enumeration and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a reservation.
///
/// Lifecycle: `hold → {pending|accepted|canceled}`,
/// `pending → {accepted|rejected|canceled}`,
/// `accepted → {completed|canceled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Time-boxed provisional hold, capacity reserved until `locked_until`.
    Hold,
    /// Completed by the customer, waiting for an owner decision.
    Pending,
    /// Confirmed by the owner (or auto-accepted).
    Accepted,
    /// Declined by the owner.
    Rejected,
    /// Canceled by the customer, the owner, or the sweeper.
    Canceled,
    /// The visit happened.
    Completed,
}

impl ReservationStatus {
    /// Check if the reservation is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled | Self::Completed)
    }

    /// Whether the customer may still cancel a reservation in this state.
    pub fn customer_cancelable(&self) -> bool {
        matches!(self, Self::Hold | Self::Pending | Self::Accepted)
    }

    /// Whether a restaurant owner may set this status on a reservation.
    ///
    /// Owners decide on completed holds; they never create or revive
    /// holds, so the owner-facing transition set is restricted.
    pub fn owner_settable(&self) -> bool {
        matches!(
            self,
            Self::Accepted | Self::Rejected | Self::Canceled | Self::Completed
        )
    }

    /// Check whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        match self {
            Self::Hold => matches!(next, Self::Pending | Self::Accepted | Self::Canceled),
            Self::Pending => matches!(next, Self::Accepted | Self::Rejected | Self::Canceled),
            Self::Accepted => matches!(next, Self::Completed | Self::Canceled),
            Self::Rejected | Self::Canceled | Self::Completed => false,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
