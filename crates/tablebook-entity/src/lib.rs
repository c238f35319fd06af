//! # tablebook-entity
//!
//! Domain entity models for TableBook. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod menu;
pub mod order;
pub mod reservation;
pub mod restaurant;
pub mod time_slot;
