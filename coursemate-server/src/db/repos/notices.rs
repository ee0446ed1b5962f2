//! Notice repository

use sqlx::PgPool;
use uuid::Uuid;

use super::DbError;
use crate::models::NoticeBody;

/// Notice repository
pub struct NoticeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> NoticeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Publish a notice; the database assigns the id.
    pub async fn create(&self, body: &NoticeBody) -> Result<Uuid, DbError> {
        let (notice_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO notices (title, content) VALUES ($1, $2) RETURNING notice_id",
        )
        .bind(&body.title)
        .bind(&body.content)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::Write)?;

        tracing::info!(%notice_id, "notice published");
        Ok(notice_id)
    }

    pub async fn update(&self, notice_id: Uuid, body: &NoticeBody) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE notices SET title = $1, content = $2 WHERE notice_id = $3")
            .bind(&body.title)
            .bind(&body.content)
            .bind(notice_id)
            .execute(self.pool)
            .await
            .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("notice", notice_id));
        }
        Ok(())
    }

    pub async fn delete(&self, notice_id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM notices WHERE notice_id = $1")
            .bind(notice_id)
            .execute(self.pool)
            .await
            .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("notice", notice_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn notice_lifecycle() {
        let pool = test_pool().await;
        let repo = NoticeRepo::new(&pool);

        let id = repo
            .create(&NoticeBody::new("Holiday hours", "Closed on Chuseok").unwrap())
            .await
            .unwrap();
        repo.update(id, &NoticeBody::new("Holiday hours", "Open as usual").unwrap())
            .await
            .unwrap();
        repo.delete(id).await.unwrap();

        assert!(matches!(
            repo.delete(id).await.unwrap_err(),
            DbError::NotFound { resource: "notice", .. }
        ));
    }
}
