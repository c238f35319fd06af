//! The reservation engine: slot locking, lifecycle transitions, and
//! the expiry sweeps.
//!
//! `service.rs` holds the service definition and the transactional lock
//! manager; `lifecycle.rs` the completion/cancellation/owner-decision
//! transitions; `sweep.rs` the periodic cleanup entry points.

pub mod lifecycle;
pub mod service;
pub mod sweep;

pub use service::{LockSlotRequest, ReservationService};
