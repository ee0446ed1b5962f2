//! Tourist spot repository: search, region candidates, photos and blog links

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::{PlaceSort, Region};

/// Tourist spot record from database
#[derive(Debug, Clone, FromRow)]
pub struct TourSpot {
    pub spot_id: i64,
    pub name: String,
    pub address: String,
    pub avg_rating: f64,
    pub reg_date: DateTime<Utc>,
}

/// Spot photo
#[derive(Debug, Clone, FromRow)]
pub struct Photo {
    pub photo_id: i64,
    pub img_url: String,
    pub reg_date: DateTime<Utc>,
}

/// External blog review link
#[derive(Debug, Clone, FromRow)]
pub struct BlogLink {
    pub blog_id: i64,
    pub title: String,
    pub url: String,
    pub blog_name: Option<String>,
    pub post_date: DateTime<Utc>,
}

/// Tourist spot repository
pub struct SpotRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SpotRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Search spots by name (case-insensitive substring) in the given order.
    pub async fn search(
        &self,
        keyword: Option<&str>,
        sort: PlaceSort,
    ) -> Result<Vec<TourSpot>, DbError> {
        // order_by() is a fixed string per enum variant, never user input
        let query = format!(
            r#"
            SELECT spot_id, name, address, avg_rating, reg_date
            FROM tour_spots
            WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)
            ORDER BY {}
            "#,
            sort.order_by()
        );

        sqlx::query_as(&query)
            .bind(keyword.filter(|k| !k.is_empty()))
            .fetch_all(self.pool)
            .await
            .map_err(DbError::Lookup)
    }

    /// Ids of every spot whose address contains `region`.
    ///
    /// `strpos` keeps `%` and `_` literal, unlike `LIKE`.
    pub async fn ids_in_region(&self, region: &Region) -> Result<Vec<i64>, DbError> {
        sqlx::query_scalar(
            "SELECT spot_id FROM tour_spots WHERE strpos(address, $1) > 0 ORDER BY spot_id",
        )
        .bind(region.as_str())
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }

    /// Fetch several spots at once, returned in the order of `ids`.
    ///
    /// Ids with no row are skipped.
    pub async fn get_many(&self, ids: &[i64]) -> Result<Vec<TourSpot>, DbError> {
        let rows: Vec<TourSpot> = sqlx::query_as(
            r#"
            SELECT spot_id, name, address, avg_rating, reg_date
            FROM tour_spots
            WHERE spot_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)?;

        Ok(ids
            .iter()
            .filter_map(|id| rows.iter().find(|s| s.spot_id == *id).cloned())
            .collect())
    }

    /// Photos for a spot, newest first.
    pub async fn photos(&self, spot_id: i64) -> Result<Vec<Photo>, DbError> {
        sqlx::query_as(
            r#"
            SELECT photo_id, img_url, reg_date
            FROM photos
            WHERE spot_id = $1
            ORDER BY reg_date DESC
            "#,
        )
        .bind(spot_id)
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }

    /// Blog review links for a spot, newest post first.
    pub async fn blogs(&self, spot_id: i64) -> Result<Vec<BlogLink>, DbError> {
        sqlx::query_as(
            r#"
            SELECT blog_id, title, url, blog_name, post_date
            FROM blog_reviews
            WHERE spot_id = $1
            ORDER BY post_date DESC
            "#,
        )
        .bind(spot_id)
        .fetch_all(self.pool)
        .await
        .map_err(DbError::Lookup)
    }
}
