//! Back-office core — domain models, repository traits, and shared
//! query/error types for the manager and order directories.

pub mod error;
pub mod identifier;
pub mod models;
pub mod query;
pub mod repository;

pub use error::{BackofficeError, BackofficeResult};
pub use identifier::Identifier;
