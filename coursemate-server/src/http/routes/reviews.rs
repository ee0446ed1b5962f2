//! Review endpoints
//!
//! Request bodies are validated into domain types before any connection is
//! taken from the pool.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{RatingSummary, ReviewRepo, ReviewWithTags};
use crate::http::envelope::{Envelope, NoPayload};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId, ValidUuid};
use crate::http::server::AppState;
use crate::models::{Rating, ReviewContent, TagName, UserId};

/// Body for POST /places/{id}/reviews
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: String,
    pub rating: i64,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body for PUT /reviews/{id}
#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: i64,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreated {
    pub review_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: Uuid,
    pub user_id: Option<String>,
    pub nickname: Option<String>,
    pub rating: i16,
    pub content: String,
    pub reg_date: String,
    pub tags: Vec<String>,
}

impl From<ReviewWithTags> for ReviewResponse {
    fn from(r: ReviewWithTags) -> Self {
        Self {
            review_id: r.review_id,
            user_id: r.user_id,
            nickname: r.nickname,
            rating: r.rating,
            content: r.content,
            reg_date: r.reg_date.to_rfc3339(),
            tags: r.tags,
        }
    }
}

#[derive(Serialize)]
pub struct ReviewList {
    pub reviews: Vec<ReviewResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total_reviews: i64,
    pub average_rating: f64,
    /// Keyed "1".."5"
    pub distribution: BTreeMap<String, i64>,
}

impl From<RatingSummary> for RatingStats {
    fn from(s: RatingSummary) -> Self {
        let distribution = [s.star1, s.star2, s.star3, s.star4, s.star5]
            .into_iter()
            .enumerate()
            .map(|(i, n)| ((i + 1).to_string(), n))
            .collect();

        Self {
            total_reviews: s.total,
            average_rating: s.rounded_average(),
            distribution,
        }
    }
}

#[derive(Serialize)]
pub struct RatingStatsPayload {
    pub stats: RatingStats,
}

/// GET /places/{id}/reviews
async fn list_reviews(
    State(state): State<Arc<AppState>>,
    ValidId(spot_id): ValidId,
) -> Result<Envelope<ReviewList>, ApiError> {
    let reviews = ReviewRepo::new(&state.pool)
        .list_for_spot(spot_id)
        .await?
        .into_iter()
        .map(ReviewResponse::from)
        .collect();

    Ok(Envelope::ok("reviews loaded", ReviewList { reviews }))
}

/// POST /places/{id}/reviews
async fn create_review(
    State(state): State<Arc<AppState>>,
    ValidId(spot_id): ValidId,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> Result<Envelope<ReviewCreated>, ApiError> {
    let author = UserId::new(&req.user_id)?;
    let rating = Rating::new(req.rating)?;
    let content = ReviewContent::new(&req.content)?;
    let tags = TagName::parse_list(&req.tags)?;

    let review_id = ReviewRepo::new(&state.pool)
        .create(spot_id, &author, rating, &content, &tags)
        .await?;

    Ok(Envelope::ok("review created", ReviewCreated { review_id }))
}

/// GET /places/{id}/rating-summary
async fn rating_summary(
    State(state): State<Arc<AppState>>,
    ValidId(spot_id): ValidId,
) -> Result<Envelope<RatingStatsPayload>, ApiError> {
    let summary = ReviewRepo::new(&state.pool).rating_summary(spot_id).await?;

    Ok(Envelope::ok(
        "rating summary loaded",
        RatingStatsPayload {
            stats: summary.into(),
        },
    ))
}

/// PUT /reviews/{id}
async fn update_review(
    State(state): State<Arc<AppState>>,
    ValidUuid(review_id): ValidUuid,
    ApiJson(req): ApiJson<UpdateReviewRequest>,
) -> Result<Envelope<NoPayload>, ApiError> {
    let rating = Rating::new(req.rating)?;
    let content = ReviewContent::new(&req.content)?;
    let tags = TagName::parse_list(&req.tags)?;

    ReviewRepo::new(&state.pool)
        .update(review_id, rating, &content, &tags)
        .await?;

    Ok(Envelope::message("review updated"))
}

/// DELETE /reviews/{id}
async fn delete_review(
    State(state): State<Arc<AppState>>,
    ValidUuid(review_id): ValidUuid,
) -> Result<Envelope<NoPayload>, ApiError> {
    ReviewRepo::new(&state.pool).delete(review_id).await?;
    Ok(Envelope::message("review deleted"))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/places/{id}/reviews",
            get(list_reviews).post(create_review),
        )
        .route("/places/{id}/rating-summary", get(rating_summary))
        .route("/reviews/{id}", put(update_review).delete(delete_review))
}
