//! Restaurant entity.

pub mod model;

pub use model::Restaurant;
