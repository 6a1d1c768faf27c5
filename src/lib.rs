//! Build parameterized SQL from structured arguments and run it on a single connection that is
//! replaced once when it goes stale.
//!
//! The connections live in their own crates: `simplesql-sqlite`, `simplesql-postgres` and
//! `simplesql-mysql`.

pub use simplesql_core::*;
