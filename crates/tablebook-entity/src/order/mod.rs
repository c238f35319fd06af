//! Pre-order entities.

pub mod model;

pub use model::{NewOrderItem, Order, OrderItem};
