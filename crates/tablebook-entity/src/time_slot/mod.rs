//! Time slot entity.

pub mod model;

pub use model::{NewTimeSlot, TimeSlot, TimeSlotUpdate};
