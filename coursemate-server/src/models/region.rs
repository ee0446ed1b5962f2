//! Recommendation query parameters

use super::validation::{required_text, ValidationError};

/// Maximum length for a region filter
const MAX_REGION_LEN: usize = 100;

/// Region filter, matched as a substring of a spot's address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region(String);

impl Region {
    /// Build a region from an optional query parameter.
    ///
    /// Missing and blank values are both rejected.
    ///
    /// # Example
    /// ```
    /// use coursemate_server::models::Region;
    ///
    /// assert!(Region::from_param(Some("서울")).is_ok());
    /// assert!(Region::from_param(Some("")).is_err());
    /// assert!(Region::from_param(None).is_err());
    /// ```
    pub fn from_param(param: Option<&str>) -> Result<Self, ValidationError> {
        let raw = param.ok_or(ValidationError::Empty { field: "region" })?;
        required_text(raw, "region", MAX_REGION_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse the comma-separated `excludeIds` parameter.
///
/// Blank segments are skipped, so `"1,,2,"` yields `[1, 2]`.
pub fn parse_exclude_ids(param: Option<&str>) -> Result<Vec<i64>, ValidationError> {
    let Some(raw) = param else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| ValidationError::InvalidVariant {
                field: "excludeIds",
                value: s.to_owned(),
            })
        })
        .collect()
}
