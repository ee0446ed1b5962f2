//! Place endpoints: search, photos and blog links

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{BlogLink, Photo, SpotRepo, TourSpot};
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiQuery, ValidId};
use crate::http::server::AppState;
use crate::models::{search_term, PlaceSort};

/// Query for GET /places/search
#[derive(Deserialize)]
pub struct PlaceSearchParams {
    pub keyword: Option<String>,
    pub sort: Option<String>,
}

/// Place in a search result
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    pub spot_id: i64,
    pub name: String,
    pub address: String,
    pub avg_rating: f64,
    pub reg_date: String,
}

impl From<TourSpot> for PlaceResponse {
    fn from(s: TourSpot) -> Self {
        Self {
            spot_id: s.spot_id,
            name: s.name,
            address: s.address,
            avg_rating: s.avg_rating,
            reg_date: s.reg_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct PlaceList {
    pub count: usize,
    pub places: Vec<PlaceResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub photo_id: i64,
    pub img_url: String,
    pub reg_date: String,
}

impl From<Photo> for PhotoResponse {
    fn from(p: Photo) -> Self {
        Self {
            photo_id: p.photo_id,
            img_url: p.img_url,
            reg_date: p.reg_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct PhotoList {
    pub count: usize,
    pub photos: Vec<PhotoResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub blog_id: i64,
    pub title: String,
    pub url: String,
    pub blog_name: Option<String>,
    pub post_date: String,
}

impl From<BlogLink> for BlogResponse {
    fn from(b: BlogLink) -> Self {
        Self {
            blog_id: b.blog_id,
            title: b.title,
            url: b.url,
            blog_name: b.blog_name,
            post_date: b.post_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct BlogList {
    pub count: usize,
    pub blogs: Vec<BlogResponse>,
}

/// GET /places/search?keyword=&sort=best|latest
async fn search_places(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PlaceSearchParams>,
) -> Result<Envelope<PlaceList>, ApiError> {
    let keyword = search_term(params.keyword.as_deref(), "keyword")?;
    let sort = PlaceSort::from_param(params.sort.as_deref());
    let spots = SpotRepo::new(&state.pool).search(keyword, sort).await?;

    let places: Vec<PlaceResponse> = spots.into_iter().map(PlaceResponse::from).collect();
    Ok(Envelope::ok(
        "places loaded",
        PlaceList {
            count: places.len(),
            places,
        },
    ))
}

/// GET /places/{id}/photos
async fn list_photos(
    State(state): State<Arc<AppState>>,
    ValidId(spot_id): ValidId,
) -> Result<Envelope<PhotoList>, ApiError> {
    let photos: Vec<PhotoResponse> = SpotRepo::new(&state.pool)
        .photos(spot_id)
        .await?
        .into_iter()
        .map(PhotoResponse::from)
        .collect();

    Ok(Envelope::ok(
        "photos loaded",
        PhotoList {
            count: photos.len(),
            photos,
        },
    ))
}

/// GET /places/{id}/blogs
async fn list_blogs(
    State(state): State<Arc<AppState>>,
    ValidId(spot_id): ValidId,
) -> Result<Envelope<BlogList>, ApiError> {
    let blogs: Vec<BlogResponse> = SpotRepo::new(&state.pool)
        .blogs(spot_id)
        .await?
        .into_iter()
        .map(BlogResponse::from)
        .collect();

    Ok(Envelope::ok(
        "blog links loaded",
        BlogList {
            count: blogs.len(),
            blogs,
        },
    ))
}

/// Place routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/places/search", get(search_places))
        .route("/places/{id}/photos", get(list_photos))
        .route("/places/{id}/blogs", get(list_blogs))
}
