//! Inquiry repository - read and remove only; inquiries are filed elsewhere

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Inquiry with the writer's display name
#[derive(Debug, Clone, FromRow)]
pub struct InquiryWithWriter {
    pub inquiry_id: i64,
    pub title: String,
    pub content: String,
    pub status: String,
    pub reg_date: DateTime<Utc>,
    pub writer: Option<String>,
}

/// Inquiry repository
pub struct InquiryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> InquiryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All inquiries, newest first.
    pub async fn list(&self) -> Result<Vec<InquiryWithWriter>, DbError> {
        sqlx::query_as(
            r#"
            SELECT i.inquiry_id, i.title, i.content, i.status, i.reg_date, u.name AS writer
            FROM inquiries i
            LEFT JOIN users u ON u.user_id = i.user_id
            ORDER BY i.reg_date DESC
            "#,
        )
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }

    pub async fn delete(&self, inquiry_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM inquiries WHERE inquiry_id = $1")
            .bind(inquiry_id)
            .execute(self.pool)
            .await
            .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("inquiry", inquiry_id));
        }
        Ok(())
    }
}
