//! Outbound notification dispatch trait.

use async_trait::async_trait;

use crate::events::ReservationEvent;

/// Fire-and-forget outbound notification interface.
///
/// The reservation engine hands domain events to a dispatcher and moves
/// on; delivery mechanics (email, push, queues) live entirely behind
/// this trait. Implementations must swallow their own failures: a
/// failed notification must never fail the operation that emitted it.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Dispatch a reservation event to its audience.
    async fn dispatch(&self, event: ReservationEvent);
}
