//! Availability computation for time slots.

pub mod service;

pub use service::{slot_open, AvailabilityService, SlotAvailability};
