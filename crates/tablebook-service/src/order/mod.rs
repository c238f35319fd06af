//! Pre-order submission.

pub mod service;

pub use service::{OrderService, PreOrderLine};
