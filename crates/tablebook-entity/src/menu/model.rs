//! Menu item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A dish on a restaurant's menu.
///
/// Prices are stored in minor currency units (cents). Pre-orders
/// snapshot the price at order time, so later edits here never change
/// an existing order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    /// Unique menu item identifier.
    pub id: Uuid,
    /// The restaurant offering this item.
    pub restaurant_id: Uuid,
    /// Display name.
    pub name: String,
    /// Current price in cents.
    pub price_cents: i64,
    /// Whether the item may appear in new pre-orders.
    pub is_available: bool,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}
