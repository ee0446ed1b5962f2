//! Review field validation

use super::validation::{required_text, ValidationError};

/// Maximum length for review bodies
const MAX_CONTENT_LEN: usize = 2000;

/// Star rating, 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(i16);

impl Rating {
    pub const MIN: i16 = 1;
    pub const MAX: i16 = 5;

    /// Create a rating, rejecting anything outside 1..=5.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                min: Self::MIN.into(),
                max: Self::MAX.into(),
                value,
            });
        }

        Ok(Self(value as i16))
    }

    pub fn get(self) -> i16 {
        self.0
    }
}

/// Validated review body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent(String);

impl ReviewContent {
    /// Create review content.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 2000 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text(s, "content", MAX_CONTENT_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
