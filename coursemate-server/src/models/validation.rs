//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Number outside its allowed range
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// String doesn't match required format (e.g., UUID)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid value in a list or enum position
    InvalidVariant { field: &'static str, value: String },

    /// Request body could not be decoded
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::OutOfRange {
                field,
                min,
                max,
                value,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, value),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::Malformed { reason } => write!(f, "malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject NUL characters, which Postgres refuses to store in text columns.
pub(crate) fn reject_nul(s: &str, field: &'static str) -> Result<(), ValidationError> {
    if s.contains('\0') {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain NUL characters",
        });
    }
    Ok(())
}

/// Optional search term from a query string.
///
/// Missing and blank values both mean "no filter".
pub fn search_term<'a>(
    param: Option<&'a str>,
    field: &'static str,
) -> Result<Option<&'a str>, ValidationError> {
    match param.map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => {
            reject_nul(term, field)?;
            Ok(Some(term))
        }
        None => Ok(None),
    }
}

/// Trim `s` and check it against the non-empty / max-length rules shared by
/// most free-text fields.
pub(crate) fn required_text(
    s: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    reject_nul(s, field)?;
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}
