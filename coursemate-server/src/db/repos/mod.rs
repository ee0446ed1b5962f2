//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Handles conflicts via ON CONFLICT (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod inquiries;
pub mod notices;
pub mod reviews;
pub mod spots;
pub mod tags;
pub mod users;

pub use inquiries::{InquiryRepo, InquiryWithWriter};
pub use notices::NoticeRepo;
pub use reviews::{RatingSummary, ReviewRepo, ReviewWithTags};
pub use spots::{BlogLink, Photo, SpotRepo, TourSpot};
pub use tags::{resolve_tag, Tag, TagRepo};
pub use users::{User, UserRepo};

/// Database error type
///
/// Reads and writes are kept apart so callers can tell a failed lookup from
/// a rolled-back write.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("lookup failed: {0}")]
    Lookup(#[source] sqlx::Error),

    #[error("write failed: {0}")]
    Write(#[source] sqlx::Error),

    #[error("{resource} '{value}' already exists")]
    Duplicate { resource: &'static str, value: String },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// True when `err` is a Postgres unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
