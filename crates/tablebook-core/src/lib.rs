//! # tablebook-core
//!
//! Core crate for TableBook. Contains configuration schemas, domain
//! events, the outbound notification trait, pagination types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other TableBook crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
