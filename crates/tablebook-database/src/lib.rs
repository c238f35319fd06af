//! # tablebook-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all TableBook entities. Repository methods that
//! must participate in the lock manager's transaction take an explicit
//! `&mut PgConnection` so the caller controls the transaction boundary.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
