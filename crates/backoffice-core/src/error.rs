//! Error types for the back-office system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackofficeError {
    #[error("{entity} not found")]
    NotFound { entity: String, id: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackofficeError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// HTTP-style status code for the caller-facing `(status, message)`
    /// pair. The message is the `Display` rendering.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::BadRequest { .. } => 400,
            Self::Forbidden { .. } => 403,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

pub type BackofficeResult<T> = Result<T, BackofficeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(BackofficeError::not_found("Order", "x").status_code(), 404);
        assert_eq!(BackofficeError::bad_request("bad").status_code(), 400);
        assert_eq!(BackofficeError::forbidden("no").status_code(), 403);
        assert_eq!(BackofficeError::Database("boom".into()).status_code(), 500);
    }

    #[test]
    fn message_is_display_rendering() {
        let err = BackofficeError::bad_request("Invalid age value");
        assert_eq!(err.to_string(), "Invalid age value");
    }
}
