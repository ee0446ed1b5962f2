//! Course recommendation endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{SpotRepo, UserRepo};
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::ApiQuery;
use crate::http::server::AppState;
use crate::models::{parse_exclude_ids, search_term, Region};
use crate::recommend::{RecommendationSelector, DEFAULT_LIMIT};

const FIRST_FEATURES: [&str; 2] = ["#분위기좋은", "#사진맛집"];
const RETRY_FEATURES: [&str; 2] = ["#힐링", "#새로운"];

/// Query for both recommendation endpoints
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendParams {
    pub user_id: Option<String>,
    pub region: Option<String>,
    /// Comma-separated spot ids, only read by the retry endpoint
    pub exclude_ids: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseItem {
    pub spot_id: i64,
    pub spot_name: String,
    pub address: String,
    pub match_score: f64,
    pub features: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct Course {
    pub course: Vec<CourseItem>,
}

/// GET /recommendations?userId=&region=
async fn recommend_first(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<RecommendParams>,
) -> Result<Envelope<Course>, ApiError> {
    let region = Region::from_param(params.region.as_deref())?;
    build_course(&state, params.user_id.as_deref(), &region, &[], &FIRST_FEATURES).await
}

/// GET /recommendations/retry?userId=&region=&excludeIds=1,2
async fn recommend_retry(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<RecommendParams>,
) -> Result<Envelope<Course>, ApiError> {
    let region = Region::from_param(params.region.as_deref())?;
    let exclude = parse_exclude_ids(params.exclude_ids.as_deref())?;
    build_course(
        &state,
        params.user_id.as_deref(),
        &region,
        &exclude,
        &RETRY_FEATURES,
    )
    .await
}

async fn build_course(
    state: &AppState,
    user_id: Option<&str>,
    region: &Region,
    exclude: &[i64],
    features: &[&'static str],
) -> Result<Envelope<Course>, ApiError> {
    // Preferences are loaded but do not yet influence selection
    if let Some(user_id) = search_term(user_id, "userId")? {
        let preferred = UserRepo::new(&state.pool).preferred_tags(user_id).await?;
        tracing::debug!(user_id, ?preferred, "preferred tags loaded");
    }

    let picked = RecommendationSelector::new(&state.pool)
        .recommend(region, exclude, DEFAULT_LIMIT)
        .await?;

    if picked.is_empty() {
        return Ok(Envelope::ok(
            "no places found for this region",
            Course { course: Vec::new() },
        ));
    }

    let ids: Vec<i64> = picked.iter().map(|r| r.spot_id).collect();
    let spots = SpotRepo::new(&state.pool).get_many(&ids).await?;

    // Keep selection order; a spot deleted in between is dropped
    let course = picked
        .iter()
        .filter_map(|rec| {
            spots
                .iter()
                .find(|s| s.spot_id == rec.spot_id)
                .map(|spot| CourseItem {
                    spot_id: spot.spot_id,
                    spot_name: spot.name.clone(),
                    address: spot.address.clone(),
                    match_score: rec.match_score,
                    features: features.to_vec(),
                })
        })
        .collect();

    Ok(Envelope::ok("course recommended", Course { course }))
}

/// Recommendation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommend_first))
        .route("/recommendations/retry", get(recommend_retry))
}
