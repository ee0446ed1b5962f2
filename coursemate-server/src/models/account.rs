//! Admin-managed records: user accounts and notices

use super::validation::{reject_nul, required_text, ValidationError};

const MAX_USER_ID_LEN: usize = 50;
const MAX_NAME_LEN: usize = 50;
const MAX_NOTICE_TITLE_LEN: usize = 200;
const MAX_NOTICE_CONTENT_LEN: usize = 10_000;

/// Validated login id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text(s, "userId", MAX_USER_ID_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Profile fields shared by user creation and update
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl UserProfile {
    pub fn new(
        name: &str,
        email: Option<String>,
        age: Option<i32>,
        gender: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = required_text(name, "name", MAX_NAME_LEN)?;
        if let Some(email) = &email {
            reject_nul(email, "email")?;
        }
        if let Some(gender) = &gender {
            reject_nul(gender, "gender")?;
        }

        if let Some(age) = age {
            if !(0..=150).contains(&age) {
                return Err(ValidationError::OutOfRange {
                    field: "age",
                    min: 0,
                    max: 150,
                    value: age.into(),
                });
            }
        }

        Ok(Self {
            name,
            email: email.filter(|e| !e.trim().is_empty()),
            age,
            gender: gender.filter(|g| !g.trim().is_empty()),
        })
    }
}

/// Title and body of a notice
#[derive(Debug, Clone)]
pub struct NoticeBody {
    pub title: String,
    pub content: String,
}

impl NoticeBody {
    pub fn new(title: &str, content: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_text(title, "title", MAX_NOTICE_TITLE_LEN)?,
            content: required_text(content, "content", MAX_NOTICE_CONTENT_LEN)?,
        })
    }
}
