//! Admin endpoints, nested under /admin
//!
//! Users, notices, inquiries, the tag catalogue and review moderation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{
    InquiryRepo, InquiryWithWriter, NoticeRepo, ReviewRepo, Tag, TagRepo, User, UserRepo,
};
use crate::http::envelope::{Envelope, NoPayload};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ValidId, ValidUuid};
use crate::http::server::AppState;
use crate::models::{
    search_term, NoticeBody, ReviewContent, TagName, UserId, UserProfile, ValidationError,
};
use crate::password::hash_password;

// ---- users ----

#[derive(Deserialize)]
pub struct UserSearchParams {
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_id: String,
    pub password: String,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub is_active: bool,
    pub join_date: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            email: u.email,
            age: u.age,
            gender: u.gender,
            is_active: u.is_active,
            join_date: u.join_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct UserList {
    pub users: Vec<UserResponse>,
}

/// GET /admin/users/search?name=
async fn search_users(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<UserSearchParams>,
) -> Result<Envelope<UserList>, ApiError> {
    let name = search_term(params.name.as_deref(), "name")?;
    let users = UserRepo::new(&state.pool)
        .search(name)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Envelope::ok("users loaded", UserList { users }))
}

/// POST /admin/users
async fn add_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Envelope<NoPayload>, ApiError> {
    let user_id = UserId::new(&req.user_id)?;
    if req.password.is_empty() {
        return Err(ValidationError::Empty { field: "password" }.into());
    }
    let profile = UserProfile::new(&req.name, req.email, req.age, req.gender)?;

    // Argon2 is CPU-bound; run it on the blocking pool
    let password = req.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal {
            message: format!("password hashing task failed: {}", e),
        })?
        .map_err(|e| ApiError::Internal {
            message: format!("password hashing failed: {}", e),
        })?;

    UserRepo::new(&state.pool)
        .create(&user_id, &hash, &profile)
        .await?;

    Ok(Envelope::message("user added"))
}

/// PUT /admin/users/{userId}
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Envelope<NoPayload>, ApiError> {
    let user_id = UserId::new(&user_id)?;
    let profile = UserProfile::new(&req.name, req.email, req.age, req.gender)?;
    UserRepo::new(&state.pool)
        .update(user_id.as_str(), &profile)
        .await?;
    Ok(Envelope::message("user updated"))
}

/// DELETE /admin/users/{userId}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Envelope<NoPayload>, ApiError> {
    let user_id = UserId::new(&user_id)?;
    UserRepo::new(&state.pool).delete(user_id.as_str()).await?;
    Ok(Envelope::message("user deleted"))
}

// ---- notices ----

#[derive(Deserialize)]
pub struct NoticeRequest {
    pub title: String,
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeCreated {
    pub notice_id: Uuid,
}

/// POST /admin/notices
async fn add_notice(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<NoticeRequest>,
) -> Result<Envelope<NoticeCreated>, ApiError> {
    let body = NoticeBody::new(&req.title, &req.content)?;
    let notice_id = NoticeRepo::new(&state.pool).create(&body).await?;
    Ok(Envelope::ok("notice added", NoticeCreated { notice_id }))
}

/// PUT /admin/notices/{id}
async fn edit_notice(
    State(state): State<Arc<AppState>>,
    ValidUuid(notice_id): ValidUuid,
    ApiJson(req): ApiJson<NoticeRequest>,
) -> Result<Envelope<NoPayload>, ApiError> {
    let body = NoticeBody::new(&req.title, &req.content)?;
    NoticeRepo::new(&state.pool).update(notice_id, &body).await?;
    Ok(Envelope::message("notice updated"))
}

/// DELETE /admin/notices/{id}
async fn remove_notice(
    State(state): State<Arc<AppState>>,
    ValidUuid(notice_id): ValidUuid,
) -> Result<Envelope<NoPayload>, ApiError> {
    NoticeRepo::new(&state.pool).delete(notice_id).await?;
    Ok(Envelope::message("notice deleted"))
}

// ---- inquiries ----

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponse {
    pub inquiry_id: i64,
    pub title: String,
    pub content: String,
    pub status: String,
    pub reg_date: String,
    pub writer: Option<String>,
}

impl From<InquiryWithWriter> for InquiryResponse {
    fn from(i: InquiryWithWriter) -> Self {
        Self {
            inquiry_id: i.inquiry_id,
            title: i.title,
            content: i.content,
            status: i.status,
            reg_date: i.reg_date.to_rfc3339(),
            writer: i.writer,
        }
    }
}

#[derive(Serialize)]
pub struct InquiryList {
    pub inquiries: Vec<InquiryResponse>,
}

/// GET /admin/inquiries
async fn list_inquiries(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<InquiryList>, ApiError> {
    let inquiries = InquiryRepo::new(&state.pool)
        .list()
        .await?
        .into_iter()
        .map(InquiryResponse::from)
        .collect();

    Ok(Envelope::ok("inquiries loaded", InquiryList { inquiries }))
}

/// DELETE /admin/inquiries/{id}
async fn remove_inquiry(
    State(state): State<Arc<AppState>>,
    ValidId(inquiry_id): ValidId,
) -> Result<Envelope<NoPayload>, ApiError> {
    InquiryRepo::new(&state.pool).delete(inquiry_id).await?;
    Ok(Envelope::message("inquiry deleted"))
}

// ---- tags ----

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub tag_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub tag_id: i64,
    pub tag_name: String,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self {
            tag_id: t.tag_id,
            tag_name: t.tag_name,
        }
    }
}

#[derive(Serialize)]
pub struct TagList {
    pub tags: Vec<TagResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCreated {
    pub tag_id: i64,
}

/// GET /admin/tags
async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Envelope<TagList>, ApiError> {
    let tags = TagRepo::new(&state.pool)
        .list()
        .await?
        .into_iter()
        .map(TagResponse::from)
        .collect();

    Ok(Envelope::ok("tags loaded", TagList { tags }))
}

/// POST /admin/tags
async fn create_tag(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TagRequest>,
) -> Result<Envelope<TagCreated>, ApiError> {
    let name = TagName::new(&req.tag_name)?;
    let tag_id = TagRepo::new(&state.pool).create(&name).await?;
    Ok(Envelope::ok("tag created", TagCreated { tag_id }))
}

/// PUT /admin/tags/{id}
async fn rename_tag(
    State(state): State<Arc<AppState>>,
    ValidId(tag_id): ValidId,
    ApiJson(req): ApiJson<TagRequest>,
) -> Result<Envelope<NoPayload>, ApiError> {
    let name = TagName::new(&req.tag_name)?;
    TagRepo::new(&state.pool).rename(tag_id, &name).await?;
    Ok(Envelope::message("tag renamed"))
}

/// DELETE /admin/tags/{id}
async fn delete_tag(
    State(state): State<Arc<AppState>>,
    ValidId(tag_id): ValidId,
) -> Result<Envelope<NoPayload>, ApiError> {
    TagRepo::new(&state.pool).delete(tag_id).await?;
    Ok(Envelope::message("tag deleted"))
}

// ---- review moderation ----

#[derive(Deserialize)]
pub struct ModerateReviewRequest {
    pub content: String,
}

/// PUT /admin/reviews/{id}
async fn moderate_review(
    State(state): State<Arc<AppState>>,
    ValidUuid(review_id): ValidUuid,
    ApiJson(req): ApiJson<ModerateReviewRequest>,
) -> Result<Envelope<NoPayload>, ApiError> {
    let content = ReviewContent::new(&req.content)?;
    ReviewRepo::new(&state.pool)
        .update_content(review_id, &content)
        .await?;

    tracing::info!(%review_id, "review moderated");
    Ok(Envelope::message("review updated"))
}

/// Admin routes, mounted under /admin
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/search", get(search_users))
        .route("/users", post(add_user))
        .route("/users/{id}", put(update_user).delete(delete_user))
        .route("/notices", post(add_notice))
        .route("/notices/{id}", put(edit_notice).delete(remove_notice))
        .route("/inquiries", get(list_inquiries))
        .route("/inquiries/{id}", axum::routing::delete(remove_inquiry))
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", put(rename_tag).delete(delete_tag))
        .route("/reviews/{id}", put(moderate_review))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::http::server::testing::{json, lazy_app, send};

    #[tokio::test]
    async fn blank_tag_name_is_400() {
        let (status, body) =
            send(lazy_app(), json("POST", "/admin/tags", json!({ "tagName": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["result_msg"], "tag name is required");
    }

    #[tokio::test]
    async fn missing_password_is_400() {
        let req = json!({ "userId": "kim", "password": "", "name": "Kim" });
        let (status, body) = send(lazy_app(), json("POST", "/admin/users", req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["result_msg"], "password is required");
    }

    #[tokio::test]
    async fn age_out_of_range_is_400() {
        let req = json!({ "name": "Kim", "age": 300 });
        let (status, _) = send(lazy_app(), json("PUT", "/admin/users/kim", req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn user_search_with_repeated_name_gets_envelope() {
        let (status, body) = send(
            lazy_app(),
            crate::http::server::testing::get("/admin/users/search?name=a&name=b"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["result_code"], 400);
    }

    #[tokio::test]
    async fn nul_in_path_user_id_is_400() {
        let req = json!({ "name": "Kim" });
        let (status, _) = send(lazy_app(), json("PUT", "/admin/users/kim%00", req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn notice_id_must_be_uuid() {
        let req = json!({ "title": "t", "content": "c" });
        let (status, _) = send(lazy_app(), json("PUT", "/admin/notices/42", req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_tag_is_400() {
        use crate::db::testing::{test_pool, unique};
        use crate::http::server::{build_router, AppState};

        let app = build_router(AppState {
            pool: test_pool().await,
        });
        let body = json!({ "tagName": unique("#tag") });

        let (status, created) = send(app.clone(), json("POST", "/admin/tags", body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(created["tagId"].is_i64());

        let (status, _) = send(app, json("POST", "/admin/tags", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_moderated_content_is_400() {
        let uri = format!("/admin/reviews/{}", uuid::Uuid::new_v4());
        let (status, body) = send(lazy_app(), json("PUT", &uri, json!({ "content": " " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["result_msg"], "content is required");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn moderating_missing_review_is_404() {
        use crate::db::testing::test_pool;
        use crate::http::server::{build_router, AppState};

        let app = build_router(AppState {
            pool: test_pool().await,
        });
        let uri = format!("/admin/reviews/{}", uuid::Uuid::new_v4());
        let (status, body) = send(app, json("PUT", &uri, json!({ "content": "hidden" }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["result_code"], 404);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn deleting_missing_notice_is_404() {
        use crate::db::testing::test_pool;
        use crate::http::server::{build_router, AppState};

        let app = build_router(AppState {
            pool: test_pool().await,
        });
        let uri = format!("/admin/notices/{}", uuid::Uuid::new_v4());
        let req = axum::http::Request::delete(uri)
            .body(axum::body::Body::empty())
            .unwrap();

        let (status, _) = send(app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
