//! Time slot registry management.

pub mod service;

pub use service::TimeSlotService;
