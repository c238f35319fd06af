//! Database-backed integration tests.
//!
//! These run against a live PostgreSQL instance and are ignored by
//! default. Point `TABLEBOOK_TEST_DATABASE_URL` at a disposable
//! database and run `cargo test -- --ignored`.

mod helpers;

mod availability_test;
mod lifecycle_test;
mod lock_test;
