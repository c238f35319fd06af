//! Core traits defined in `tablebook-core` and implemented by other crates.

pub mod notifier;

pub use notifier::NotificationDispatcher;
