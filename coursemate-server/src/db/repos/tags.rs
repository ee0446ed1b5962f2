//! Tag repository
//!
//! - resolve: find-or-create as a single upsert, usable inside a transaction
//! - create: explicit admin creation, duplicates rejected

use sqlx::{FromRow, PgConnection, PgPool};

use super::{is_unique_violation, DbError};
use crate::models::TagName;

/// Tag record from database
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub tag_id: i64,
    pub tag_name: String,
}

/// Return the id of the tag called `name`, inserting it if absent.
///
/// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on
/// conflict, so two transactions racing on a new name both get the one id
/// the unique index allows.
pub async fn resolve_tag(conn: &mut PgConnection, name: &TagName) -> Result<i64, DbError> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO tags (tag_name) VALUES ($1)
        ON CONFLICT (tag_name) DO UPDATE SET tag_name = EXCLUDED.tag_name
        RETURNING tag_id
        "#,
    )
    .bind(name.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(DbError::Write)?;

    Ok(row.0)
}

/// Tag repository
pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a tag on a pooled connection.
    pub async fn resolve(&self, name: &TagName) -> Result<i64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Write)?;
        resolve_tag(&mut conn, name).await
    }

    /// All tags in id order.
    pub async fn list(&self) -> Result<Vec<Tag>, DbError> {
        sqlx::query_as("SELECT tag_id, tag_name FROM tags ORDER BY tag_id ASC")
            .fetch_all(self.pool)
            .await
            .map_err(DbError::Lookup)
    }

    /// Create a tag ahead of use. An existing name is a `Duplicate`.
    pub async fn create(&self, name: &TagName) -> Result<i64, DbError> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO tags (tag_name) VALUES ($1)
            ON CONFLICT (tag_name) DO NOTHING
            RETURNING tag_id
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::Write)?;

        row.map(|r| r.0).ok_or_else(|| DbError::Duplicate {
            resource: "tag",
            value: name.as_str().to_owned(),
        })
    }

    /// Rename a tag. Every review carrying it shows the new name.
    pub async fn rename(&self, tag_id: i64, name: &TagName) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE tags SET tag_name = $1 WHERE tag_id = $2")
            .bind(name.as_str())
            .bind(tag_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::Duplicate {
                        resource: "tag",
                        value: name.as_str().to_owned(),
                    }
                } else {
                    DbError::Write(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("tag", tag_id));
        }
        Ok(())
    }

    /// Delete a tag; its review and preference links cascade.
    pub async fn delete(&self, tag_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tags WHERE tag_id = $1")
            .bind(tag_id)
            .execute(self.pool)
            .await
            .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("tag", tag_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{test_pool, unique};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn resolve_is_idempotent() {
        let pool = test_pool().await;
        let repo = TagRepo::new(&pool);
        let name = TagName::new(&unique("night-view")).unwrap();

        let first = repo.resolve(&name).await.unwrap();
        let second = repo.resolve(&name).await.unwrap();
        assert_eq!(first, second);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags WHERE tag_name = $1")
            .bind(name.as_str())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_resolve_yields_one_row() {
        let pool = test_pool().await;
        let name = TagName::new(&unique("race")).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = pool.clone();
                let name = name.clone();
                tokio::spawn(async move { TagRepo::new(&pool).resolve(&name).await.unwrap() })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_rejects_existing_name() {
        let pool = test_pool().await;
        let repo = TagRepo::new(&pool);
        let name = TagName::new(&unique("dup")).unwrap();

        repo.create(&name).await.unwrap();
        let err = repo.create(&name).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate { resource: "tag", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn rename_and_delete() {
        let pool = test_pool().await;
        let repo = TagRepo::new(&pool);
        let taken = TagName::new(&unique("taken")).unwrap();
        let id = repo.create(&TagName::new(&unique("typo")).unwrap()).await.unwrap();
        repo.create(&taken).await.unwrap();

        let err = repo.rename(id, &taken).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate { .. }));

        let fixed = TagName::new(&unique("fixed")).unwrap();
        repo.rename(id, &fixed).await.unwrap();
        assert_eq!(repo.resolve(&fixed).await.unwrap(), id);

        repo.delete(id).await.unwrap();
        assert!(matches!(
            repo.delete(id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
