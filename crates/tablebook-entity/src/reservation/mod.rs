//! Reservation entity: model, status enum, and value objects.

pub mod model;
pub mod status;

pub use model::{CompletionDetails, NewHold, Reservation};
pub use status::ReservationStatus;
