//! Review repository
//!
//! Review rows and their tag links are always written together:
//! - create: review + tags in one transaction
//! - update: rating/content + full replacement of the tag set
//! - delete: links go with the review (`ON DELETE CASCADE`)

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::tags::resolve_tag;
use super::DbError;
use crate::models::{Rating, ReviewContent, TagName, UserId};

/// Review with author nickname and tag names, for per-spot listings
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithTags {
    pub review_id: Uuid,
    pub user_id: Option<String>,
    pub nickname: Option<String>,
    pub rating: i16,
    pub content: String,
    pub reg_date: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Star statistics for one spot
#[derive(Debug, Clone, FromRow)]
pub struct RatingSummary {
    pub total: i64,
    pub average: f64,
    pub star1: i64,
    pub star2: i64,
    pub star3: i64,
    pub star4: i64,
    pub star5: i64,
}

impl RatingSummary {
    /// Average rounded to one decimal place.
    pub fn rounded_average(&self) -> f64 {
        (self.average * 10.0).round() / 10.0
    }
}

/// Review repository
pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a review with its tags (atomic).
    ///
    /// Unknown tag names are created on the way. If any statement fails the
    /// whole transaction is rolled back, leaving neither review nor links.
    pub async fn create(
        &self,
        spot_id: i64,
        author: &UserId,
        rating: Rating,
        content: &ReviewContent,
        tags: &[TagName],
    ) -> Result<Uuid, DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Write)?;
        let result = insert_review(&mut tx, spot_id, author, rating, content, tags).await;
        let review_id = finish(tx, result).await?;

        tracing::info!(%review_id, spot_id, tags = tags.len(), "review created");
        Ok(review_id)
    }

    /// Update rating and content and replace the tag set (atomic).
    ///
    /// After this returns, the review carries exactly `tags`; an empty slice
    /// clears every link.
    pub async fn update(
        &self,
        review_id: Uuid,
        rating: Rating,
        content: &ReviewContent,
        tags: &[TagName],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Write)?;
        let result = rewrite_review(&mut tx, review_id, rating, content, tags).await;
        finish(tx, result).await?;

        tracing::info!(%review_id, tags = tags.len(), "review updated");
        Ok(())
    }

    /// Delete a review. Tag links cascade.
    pub async fn delete(&self, review_id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(self.pool)
            .await
            .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("review", review_id));
        }

        tracing::info!(%review_id, "review deleted");
        Ok(())
    }

    /// Replace only the content; used for admin moderation.
    pub async fn update_content(
        &self,
        review_id: Uuid,
        content: &ReviewContent,
    ) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE reviews SET content = $1 WHERE review_id = $2")
            .bind(content.as_str())
            .bind(review_id)
            .execute(self.pool)
            .await
            .map_err(DbError::Write)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("review", review_id));
        }
        Ok(())
    }

    /// Tag names attached to a review, alphabetical.
    pub async fn tags_for_review(&self, review_id: Uuid) -> Result<Vec<String>, DbError> {
        sqlx::query_scalar(
            r#"
            SELECT t.tag_name
            FROM review_tags rt
            JOIN tags t ON t.tag_id = rt.tag_id
            WHERE rt.review_id = $1
            ORDER BY t.tag_name
            "#,
        )
        .bind(review_id)
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }

    /// Reviews for a spot, newest first, with tags aggregated in one query.
    pub async fn list_for_spot(&self, spot_id: i64) -> Result<Vec<ReviewWithTags>, DbError> {
        sqlx::query_as(
            r#"
            SELECT
                r.review_id,
                r.user_id,
                u.name AS nickname,
                r.rating,
                r.content,
                r.reg_date,
                COALESCE(
                    array_agg(t.tag_name ORDER BY t.tag_name) FILTER (WHERE t.tag_id IS NOT NULL),
                    '{}'
                ) AS tags
            FROM reviews r
            LEFT JOIN users u ON u.user_id = r.user_id
            LEFT JOIN review_tags rt ON rt.review_id = r.review_id
            LEFT JOIN tags t ON t.tag_id = rt.tag_id
            WHERE r.spot_id = $1
            GROUP BY r.review_id, u.name
            ORDER BY r.reg_date DESC
            "#,
        )
        .bind(spot_id)
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }

    /// Count, average and 1..5 distribution. A spot without reviews reports
    /// zeros rather than an error.
    pub async fn rating_summary(&self, spot_id: i64) -> Result<RatingSummary, DbError> {
        sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(AVG(rating), 0)::float8 AS average,
                COUNT(*) FILTER (WHERE rating = 1) AS star1,
                COUNT(*) FILTER (WHERE rating = 2) AS star2,
                COUNT(*) FILTER (WHERE rating = 3) AS star3,
                COUNT(*) FILTER (WHERE rating = 4) AS star4,
                COUNT(*) FILTER (WHERE rating = 5) AS star5
            FROM reviews
            WHERE spot_id = $1
            "#,
        )
        .bind(spot_id)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::Lookup)
    }
}

/// Commit on success, roll back on failure. The first error wins over a
/// failed rollback; the pool discards that connection either way.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, DbError>,
) -> Result<T, DbError> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(DbError::Write)?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(error = %err, "rolling back review write");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn insert_review(
    conn: &mut PgConnection,
    spot_id: i64,
    author: &UserId,
    rating: Rating,
    content: &ReviewContent,
    tags: &[TagName],
) -> Result<Uuid, DbError> {
    let (spot_exists, author_exists): (bool, bool) = sqlx::query_as(
        r#"
        SELECT
            EXISTS(SELECT 1 FROM tour_spots WHERE spot_id = $1),
            EXISTS(SELECT 1 FROM users WHERE user_id = $2)
        "#,
    )
    .bind(spot_id)
    .bind(author.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(DbError::Write)?;

    if !spot_exists {
        return Err(DbError::not_found("place", spot_id));
    }
    if !author_exists {
        return Err(DbError::not_found("user", author.as_str()));
    }

    let (review_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO reviews (user_id, spot_id, rating, content)
        VALUES ($1, $2, $3, $4)
        RETURNING review_id
        "#,
    )
    .bind(author.as_str())
    .bind(spot_id)
    .bind(rating.get())
    .bind(content.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(DbError::Write)?;

    attach_tags(conn, review_id, tags).await?;
    Ok(review_id)
}

async fn rewrite_review(
    conn: &mut PgConnection,
    review_id: Uuid,
    rating: Rating,
    content: &ReviewContent,
    tags: &[TagName],
) -> Result<(), DbError> {
    let updated = sqlx::query("UPDATE reviews SET rating = $1, content = $2 WHERE review_id = $3")
        .bind(rating.get())
        .bind(content.as_str())
        .bind(review_id)
        .execute(&mut *conn)
        .await
        .map_err(DbError::Write)?;

    if updated.rows_affected() == 0 {
        return Err(DbError::not_found("review", review_id));
    }

    sqlx::query("DELETE FROM review_tags WHERE review_id = $1")
        .bind(review_id)
        .execute(&mut *conn)
        .await
        .map_err(DbError::Write)?;

    attach_tags(conn, review_id, tags).await
}

/// Link each distinct tag name to the review, creating tags as needed.
async fn attach_tags(
    conn: &mut PgConnection,
    review_id: Uuid,
    tags: &[TagName],
) -> Result<(), DbError> {
    let mut seen = HashSet::with_capacity(tags.len());

    for tag in tags {
        if !seen.insert(tag.as_str()) {
            continue;
        }

        let tag_id = resolve_tag(conn, tag).await?;

        sqlx::query(
            r#"
            INSERT INTO review_tags (review_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(review_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await
        .map_err(DbError::Write)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::TagRepo;
    use crate::db::testing::{seed_spot, seed_user, test_pool, unique};

    fn tags(names: &[&str]) -> Vec<TagName> {
        names.iter().map(|n| TagName::new(n).unwrap()).collect()
    }

    fn content(s: &str) -> ReviewContent {
        ReviewContent::new(s).unwrap()
    }

    async fn reject_links_to(pool: &PgPool, tag_id: i64) {
        sqlx::query(&format!(
            r#"
            CREATE FUNCTION reject_tag_{id}() RETURNS trigger LANGUAGE plpgsql AS $$
            BEGIN
                IF NEW.tag_id = {id} THEN
                    RAISE EXCEPTION 'links to tag {id} are refused';
                END IF;
                RETURN NEW;
            END
            $$
            "#,
            id = tag_id
        ))
        .execute(pool)
        .await
        .unwrap();

        sqlx::query(&format!(
            "CREATE TRIGGER reject_tag_{id} BEFORE INSERT ON review_tags \
             FOR EACH ROW EXECUTE FUNCTION reject_tag_{id}()",
            id = tag_id
        ))
        .execute(pool)
        .await
        .unwrap();
    }

    async fn allow_links_to(pool: &PgPool, tag_id: i64) {
        sqlx::query(&format!("DROP TRIGGER reject_tag_{} ON review_tags", tag_id))
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(&format!("DROP FUNCTION reject_tag_{}()", tag_id))
            .execute(pool)
            .await
            .unwrap();
    }

    async fn fixture(pool: &PgPool) -> (i64, UserId) {
        let spot_id = seed_spot(pool, "Gyeongbokgung", &unique("Seoul Jongno")).await;
        let user = UserId::new(&seed_user(pool).await).unwrap();
        (spot_id, user)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_stores_tag_set_without_duplicates() {
        let pool = test_pool().await;
        let repo = ReviewRepo::new(&pool);
        let (spot_id, user) = fixture(&pool).await;
        let sea = unique("sea");
        let food = unique("food");

        let review_id = repo
            .create(
                spot_id,
                &user,
                Rating::new(5).unwrap(),
                &content("Lovely"),
                &tags(&[sea.as_str(), food.as_str(), sea.as_str()]),
            )
            .await
            .unwrap();

        let mut expected = vec![food, sea];
        expected.sort();
        assert_eq!(repo.tags_for_review(review_id).await.unwrap(), expected);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_replaces_and_clears_tags() {
        let pool = test_pool().await;
        let repo = ReviewRepo::new(&pool);
        let (spot_id, user) = fixture(&pool).await;
        let (a, b, c) = (unique("a"), unique("b"), unique("c"));

        let review_id = repo
            .create(spot_id, &user, Rating::new(3).unwrap(), &content("ok"), &tags(&[a.as_str(), b.as_str()]))
            .await
            .unwrap();

        repo.update(review_id, Rating::new(4).unwrap(), &content("better"), &tags(&[c.as_str()]))
            .await
            .unwrap();
        assert_eq!(repo.tags_for_review(review_id).await.unwrap(), vec![c]);

        repo.update(review_id, Rating::new(4).unwrap(), &content("better"), &[])
            .await
            .unwrap();
        assert!(repo.tags_for_review(review_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failure_on_second_tag_rolls_back_everything() {
        let pool = test_pool().await;
        let repo = ReviewRepo::new(&pool);
        let (spot_id, user) = fixture(&pool).await;
        let first = unique("first");
        let refused = TagName::new(&unique("refused")).unwrap();

        // A trigger that rejects links to one tag makes the second link insert fail
        let refused_id = TagRepo::new(&pool)
            .resolve(&refused)
            .await
            .unwrap();
        reject_links_to(&pool, refused_id).await;

        let result = repo
            .create(
                spot_id,
                &user,
                Rating::new(2).unwrap(),
                &content("doomed"),
                &[TagName::new(&first).unwrap(), refused],
            )
            .await;
        allow_links_to(&pool, refused_id).await;

        assert!(matches!(result.unwrap_err(), DbError::Write(_)));

        let reviews: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE spot_id = $1")
            .bind(spot_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(reviews.0, 0);

        // The tag created before the failure is rolled back too
        let created: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags WHERE tag_name = $1")
            .bind(&first)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(created.0, 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_removes_links() {
        let pool = test_pool().await;
        let repo = ReviewRepo::new(&pool);
        let (spot_id, user) = fixture(&pool).await;

        let review_id = repo
            .create(spot_id, &user, Rating::new(1).unwrap(), &content("meh"), &tags(&[unique("x").as_str()]))
            .await
            .unwrap();
        repo.delete(review_id).await.unwrap();

        let links: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM review_tags WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(links.0, 0);

        assert!(matches!(
            repo.delete(review_id).await.unwrap_err(),
            DbError::NotFound { resource: "review", .. }
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn moderation_replaces_content_only() {
        let pool = test_pool().await;
        let repo = ReviewRepo::new(&pool);
        let (spot_id, user) = fixture(&pool).await;
        let tag = unique("calm");

        let review_id = repo
            .create(spot_id, &user, Rating::new(4).unwrap(), &content("rude words"), &tags(&[tag.as_str()]))
            .await
            .unwrap();

        repo.update_content(review_id, &content("[removed by admin]"))
            .await
            .unwrap();

        let reviews = repo.list_for_spot(spot_id).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].content, "[removed by admin]");
        assert_eq!(reviews[0].rating, 4);
        assert_eq!(reviews[0].tags, vec![tag]);

        assert!(matches!(
            repo.update_content(Uuid::new_v4(), &content("x")).await.unwrap_err(),
            DbError::NotFound { resource: "review", .. }
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_for_missing_spot_is_not_found() {
        let pool = test_pool().await;
        let user = UserId::new(&seed_user(&pool).await).unwrap();

        let err = ReviewRepo::new(&pool)
            .create(-1, &user, Rating::new(3).unwrap(), &content("?"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "place", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn listing_and_summary() {
        let pool = test_pool().await;
        let repo = ReviewRepo::new(&pool);
        let (spot_id, user) = fixture(&pool).await;
        let tag = unique("view");

        repo.create(spot_id, &user, Rating::new(5).unwrap(), &content("wow"), &tags(&[tag.as_str()]))
            .await
            .unwrap();
        repo.create(spot_id, &user, Rating::new(4).unwrap(), &content("nice"), &[])
            .await
            .unwrap();

        let reviews = repo.list_for_spot(spot_id).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.nickname.as_deref() == Some("Tester")));
        assert!(reviews.iter().any(|r| r.tags == vec![tag.clone()]));
        assert!(reviews.iter().any(|r| r.tags.is_empty()));

        let summary = repo.rating_summary(spot_id).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.rounded_average(), 4.5);
        assert_eq!((summary.star4, summary.star5, summary.star1), (1, 1, 0));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn summary_for_unreviewed_spot_is_zero() {
        let pool = test_pool().await;
        let spot_id = seed_spot(&pool, "Quiet", &unique("Busan")).await;

        let summary = ReviewRepo::new(&pool).rating_summary(spot_id).await.unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average, 0.0);
    }

    #[test]
    fn rounded_average() {
        let summary = RatingSummary {
            total: 3,
            average: 4.333_333,
            star1: 0,
            star2: 0,
            star3: 0,
            star4: 2,
            star5: 1,
        };
        assert_eq!(summary.rounded_average(), 4.3);
    }
}
