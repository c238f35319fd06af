//! Sweep job implementations.

pub mod auto_cancel;
pub mod cleanup;

pub use auto_cancel::AutoCancelPendingJob;
pub use cleanup::CleanupExpiredLocksJob;
