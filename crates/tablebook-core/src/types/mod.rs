//! Core type definitions used across the TableBook workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
