//! Menu item entity.

pub mod model;

pub use model::MenuItem;
