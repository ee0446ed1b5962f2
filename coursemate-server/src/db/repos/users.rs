//! User repository - admin account management and preference lookup

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{is_unique_violation, DbError};
use crate::models::{UserId, UserProfile};

/// User record without the password hash
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Users whose name contains `name`, newest first. `None` lists all.
    pub async fn search(&self, name: Option<&str>) -> Result<Vec<User>, DbError> {
        sqlx::query_as(
            r#"
            SELECT user_id, name, email, age, gender, is_active, join_date
            FROM users
            WHERE ($1::text IS NULL OR strpos(name, $1) > 0)
            ORDER BY join_date DESC
            "#,
        )
        .bind(name.filter(|n| !n.is_empty()))
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }

    /// Insert an account. `password_hash` must already be hashed.
    pub async fn create(
        &self,
        user_id: &UserId,
        password_hash: &str,
        profile: &UserProfile,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, password, name, email, age, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id.as_str())
        .bind(password_hash)
        .bind(&profile.name)
        .bind(profile.email.as_deref())
        .bind(profile.age)
        .bind(profile.gender.as_deref())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DbError::Duplicate {
                    resource: "user",
                    value: user_id.as_str().to_owned(),
                }
            } else {
                DbError::Write(e)
            }
        })?;

        tracing::info!(user_id = user_id.as_str(), "user added");
        Ok(())
    }

    pub async fn update(&self, user_id: &str, profile: &UserProfile) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE users SET name = $1, email = $2, age = $3, gender = $4 WHERE user_id = $5",
        )
        .bind(&profile.name)
        .bind(profile.email.as_deref())
        .bind(profile.age)
        .bind(profile.gender.as_deref())
        .bind(user_id)
        .execute(self.pool)
        .await
        .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", user_id));
        }
        Ok(())
    }

    /// Permanently delete an account. Their reviews stay, authorless.
    pub async fn delete(&self, user_id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", user_id));
        }

        tracing::info!(user_id, "user deleted");
        Ok(())
    }

    /// Names of the tags a user marked as preferred.
    pub async fn preferred_tags(&self, user_id: &str) -> Result<Vec<String>, DbError> {
        sqlx::query_scalar(
            r#"
            SELECT t.tag_name
            FROM user_preferences up
            JOIN tags t ON t.tag_id = up.tag_id
            WHERE up.user_id = $1
            ORDER BY t.tag_name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{test_pool, unique};

    fn profile(name: &str) -> UserProfile {
        UserProfile::new(name, Some("kim@example.com".into()), Some(27), Some("F".into())).unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_rejects_taken_id() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);
        let id = UserId::new(&unique("kim")).unwrap();

        repo.create(&id, "hash", &profile("Kim")).await.unwrap();
        let err = repo.create(&id, "hash", &profile("Kim")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate { resource: "user", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn search_update_delete() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);
        let name = unique("Lee");
        let id = UserId::new(&unique("lee")).unwrap();
        repo.create(&id, "hash", &profile(&name)).await.unwrap();

        let found = repo.search(Some(&name)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email.as_deref(), Some("kim@example.com"));
        assert!(found[0].is_active);

        repo.update(id.as_str(), &profile("Renamed")).await.unwrap();
        repo.delete(id.as_str()).await.unwrap();
        assert!(matches!(
            repo.update(id.as_str(), &profile("Ghost")).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn preferred_tags_for_unknown_user_is_empty() {
        let pool = test_pool().await;
        let tags = UserRepo::new(&pool).preferred_tags(&unique("nobody")).await.unwrap();
        assert!(tags.is_empty());
    }
}
