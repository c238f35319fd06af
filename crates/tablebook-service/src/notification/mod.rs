//! Notification dispatcher implementations.

pub mod log;

pub use log::LogDispatcher;
