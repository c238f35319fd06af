//! Restaurant entity model.
//!
//! The reservation engine only reads the booking-relevant flags;
//! profile management lives outside this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A restaurant as seen by the reservation engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    /// Unique restaurant identifier.
    pub id: Uuid,
    /// The owner's user ID.
    pub owner_id: Uuid,
    /// Display name.
    pub name: String,
    /// Whether the restaurant is live on the marketplace.
    pub is_active: bool,
    /// Whether the restaurant currently accepts reservations.
    pub is_reservable: bool,
    /// Whether completed holds skip the pending-approval state.
    pub auto_accept: bool,
    /// When the restaurant was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Whether customers may start a booking here right now.
    pub fn accepts_bookings(&self) -> bool {
        self.is_active && self.is_reservable
    }
}
