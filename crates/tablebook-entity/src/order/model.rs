//! Pre-order entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A pre-order attached to an accepted reservation.
///
/// The total and every line price are snapshots taken at submission
/// time; canceling the reservation later never deletes its orders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    /// Unique order identifier.
    pub id: Uuid,
    /// The reservation this order belongs to.
    pub reservation_id: Uuid,
    /// Human-readable order reference (`ORD-XXXXXXXX`).
    pub order_number: String,
    /// Snapshot total in cents.
    pub total_cents: i64,
    /// When the order was submitted.
    pub created_at: DateTime<Utc>,
}

/// A single line of a pre-order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    /// Unique line identifier.
    pub id: Uuid,
    /// The order this line belongs to.
    pub order_id: Uuid,
    /// The menu item ordered.
    pub menu_item_id: Uuid,
    /// Quantity ordered.
    pub quantity: i32,
    /// Menu price at order time, in cents.
    pub price_cents: i64,
}

/// A validated pre-order line ready for insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    /// The menu item ordered.
    pub menu_item_id: Uuid,
    /// Quantity ordered.
    pub quantity: i32,
    /// Snapshotted price in cents.
    pub price_cents: i64,
}

impl NewOrderItem {
    /// The line total in cents.
    pub fn line_total(&self) -> i64 {
        self.price_cents * i64::from(self.quantity)
    }
}
