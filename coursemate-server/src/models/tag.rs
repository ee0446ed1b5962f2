//! Tag name validation

use std::collections::HashSet;

use super::validation::{required_text, ValidationError};

/// Maximum length for tag names
const MAX_TAG_NAME_LEN: usize = 50;

/// Validated tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a new tag name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 50 characters
    ///
    /// # Example
    /// ```
    /// use coursemate_server::models::TagName;
    ///
    /// assert!(TagName::new("#야경").is_ok());
    /// assert!(TagName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text(s, "tag name", MAX_TAG_NAME_LEN).map(Self)
    }

    /// Validate a caller-supplied tag list, dropping repeated names.
    ///
    /// Order of first occurrence is kept. Names are compared after trimming,
    /// so `"night"` and `" night "` collapse into one.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, ValidationError> {
        let mut seen = HashSet::with_capacity(names.len());
        let mut tags = Vec::with_capacity(names.len());

        for name in names {
            let tag = Self::new(name.as_ref())?;
            if seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }

        Ok(tags)
    }

    /// Get the tag name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
