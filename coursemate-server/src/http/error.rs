//! API error types with IntoResponse
//!
//! Errors become envelope responses with a matching status code. Storage
//! failures are logged here and reported to the client without detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::envelope::Envelope;
use crate::db::DbError;
use crate::models::ValidationError;

const SERVER_ERROR_MSG: &str = "server error";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Unique value already taken (400)
    Duplicate { resource: &'static str, value: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database read or write failed (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Duplicate { resource, value } => (
                StatusCode::BAD_REQUEST,
                format!("{} '{}' already exists", resource, value),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                format!("{} '{}' not found", resource, id),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                match e {
                    DbError::Write(_) => tracing::error!(error = %e, "write failed, rolled back"),
                    _ => tracing::error!(error = %e, "lookup failed"),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MSG.to_owned())
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MSG.to_owned())
            }
        };

        Envelope::error(status, msg).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Duplicate { resource, value } => Self::Duplicate { resource, value },
            _ => Self::Database(e),
        }
    }
}
