//! Scheduled sweeps for TableBook.
//!
//! This crate provides:
//! - A cron scheduler wiring the periodic sweeps to the engine
//! - Job implementations for expired-lock cleanup and stale-pending
//!   auto-cancel
//!
//! The schedule itself is the retry mechanism: a failed run is logged
//! and the next tick tries again, so jobs never escalate errors.

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
