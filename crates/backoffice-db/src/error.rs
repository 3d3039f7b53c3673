//! Database-specific error types and conversions.

use backoffice_core::error::BackofficeError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid stored value: {0}")]
    Corrupt(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for BackofficeError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => BackofficeError::NotFound { entity, id },
            other => BackofficeError::Database(other.to_string()),
        }
    }
}
