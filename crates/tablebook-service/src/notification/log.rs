//! Tracing-backed notification dispatcher.
//!
//! Delivery mechanics (email, push) live outside this system; the
//! default dispatcher just records the outbound event so the delivery
//! layer can be swapped in behind the same trait.

use async_trait::async_trait;
use tracing::info;

use tablebook_core::events::ReservationEvent;
use tablebook_core::traits::NotificationDispatcher;

/// Dispatcher that logs every outbound event.
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

impl LogDispatcher {
    /// Creates a new logging dispatcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, event: ReservationEvent) {
        match &event {
            ReservationEvent::Created {
                reservation_id,
                restaurant_id,
                status,
                ..
            } => {
                info!(
                    target: "tablebook::notifications",
                    reservation_id = %reservation_id,
                    restaurant_id = %restaurant_id,
                    status = %status,
                    "Owner notification: reservation created"
                );
            }
            ReservationEvent::StatusUpdated {
                reservation_id,
                user_id,
                status,
                ..
            } => {
                info!(
                    target: "tablebook::notifications",
                    reservation_id = %reservation_id,
                    user_id = %user_id,
                    status = %status,
                    "Customer notification: reservation status updated"
                );
            }
        }
    }
}
