//! Domain events emitted by TableBook operations.
//!
//! Events are handed to the outbound [`NotificationDispatcher`] and
//! consumed by the notification delivery layer (email, push). The core
//! never waits on or depends on delivery success.
//!
//! [`NotificationDispatcher`]: crate::traits::NotificationDispatcher

pub mod reservation;

pub use reservation::ReservationEvent;
