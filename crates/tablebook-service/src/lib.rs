//! # tablebook-service
//!
//! Business logic service layer for TableBook. Each service orchestrates
//! repositories and the outbound notification dispatcher to implement
//! the reservation engine's use cases: availability computation, slot
//! locking, the reservation lifecycle, the expiry sweeps, time slot
//! management, and pre-orders.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod availability;
pub mod context;
pub mod notification;
pub mod order;
pub mod reservation;
pub mod time_slot;

pub use availability::{AvailabilityService, SlotAvailability};
pub use context::RequestContext;
pub use notification::LogDispatcher;
pub use order::{OrderService, PreOrderLine};
pub use reservation::{LockSlotRequest, ReservationService};
pub use time_slot::TimeSlotService;
