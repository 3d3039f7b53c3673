//! Back-office Database — SurrealDB connection management and
//! repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Filter-map to query-predicate translation ([`filter`])
//! - Password hashing ([`password`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod filter;
pub mod password;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use password::{hash_password, verify_password};
pub use schema::{run_migrations, schema_v1};
