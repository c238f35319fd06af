//! Reservation engine configuration.

use serde::{Deserialize, Serialize};

/// Reservation engine configuration.
///
/// `hold_minutes` is the time-boxed hold a customer gets between locking
/// a slot and completing the reservation. Historical deployments drifted
/// between 5 and 10 minutes; 10 is the canonical value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// How long a slot hold stays valid before expiring, in minutes.
    #[serde(default = "default_hold_minutes")]
    pub hold_minutes: i64,
    /// How long a pending reservation may wait for an owner decision
    /// before the sweeper auto-cancels it, in hours.
    #[serde(default = "default_pending_max_age_hours")]
    pub pending_max_age_hours: i64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            hold_minutes: default_hold_minutes(),
            pending_max_age_hours: default_pending_max_age_hours(),
        }
    }
}

fn default_hold_minutes() -> i64 {
    10
}

fn default_pending_max_age_hours() -> i64 {
    24
}
