use crate::error::{AppError, AppResult};
use crate::middleware::auth::require_user;
use crate::models::{CommentModel, Identity, ReplyModel};
use crate::response::ApiResponse;
use crate::services::comment::{CommentService, CommentThread};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContentRequest {
    /// Plain-text content (1-5000 characters)
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeResponse {
    /// Whether the caller now likes the comment
    pub liked: bool,
    pub like_count: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/forum/subjects/{id}/comments",
    params(("id" = i32, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Comment threads for the subject", body = [CommentThread]),
        (status = 404, description = "Subject not found", body = AppError),
    ),
    tag = "forum"
)]
pub async fn list_comments(
    Extension(db): Extension<DatabaseConnection>,
    Path(subject_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = CommentService::new(db);
    let threads = service.list_by_subject(subject_id).await?;
    Ok(ApiResponse::ok(threads))
}

#[utoipa::path(
    post,
    path = "/api/v1/forum/subjects/{id}/comments",
    params(("id" = i32, Path, description = "Subject ID")),
    security(("jwt_token" = [])),
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Comment created", body = CommentModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "forum"
)]
pub async fn create_comment(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(subject_id): Path<i32>,
    Json(payload): Json<ContentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user = require_user(&identity)?;

    let service = CommentService::new(db);
    let comment = service.create(subject_id, user.id, &payload.content).await?;
    Ok(ApiResponse::ok(comment))
}

#[utoipa::path(
    put,
    path = "/api/v1/forum/comments/{id}",
    params(("id" = i32, Path, description = "Comment ID")),
    security(("jwt_token" = [])),
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentModel),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "forum"
)]
pub async fn update_comment(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(payload): Json<ContentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user = require_user(&identity)?;

    let service = CommentService::new(db);
    let comment = service.update(id, user.id, &payload.content).await?;
    Ok(ApiResponse::ok(comment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/forum/comments/{id}",
    params(("id" = i32, Path, description = "Comment ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Comment deleted", body = String),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "forum"
)]
pub async fn delete_comment(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = CommentService::new(db);
    service
        .delete(id, identity.id(), identity.is_admin())
        .await?;
    Ok(ApiResponse::ok("Comment deleted"))
}

#[utoipa::path(
    post,
    path = "/api/v1/forum/comments/{id}/replies",
    params(("id" = i32, Path, description = "Comment ID")),
    security(("jwt_token" = [])),
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Reply created", body = ReplyModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "forum"
)]
pub async fn create_reply(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(comment_id): Path<i32>,
    Json(payload): Json<ContentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user = require_user(&identity)?;

    let service = CommentService::new(db);
    let reply = service
        .create_reply(comment_id, user.id, &payload.content)
        .await?;
    Ok(ApiResponse::ok(reply))
}

#[utoipa::path(
    put,
    path = "/api/v1/forum/replies/{id}",
    params(("id" = i32, Path, description = "Reply ID")),
    security(("jwt_token" = [])),
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Reply updated", body = ReplyModel),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Reply not found", body = AppError),
    ),
    tag = "forum"
)]
pub async fn update_reply(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(payload): Json<ContentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user = require_user(&identity)?;

    let service = CommentService::new(db);
    let reply = service.update_reply(id, user.id, &payload.content).await?;
    Ok(ApiResponse::ok(reply))
}

#[utoipa::path(
    delete,
    path = "/api/v1/forum/replies/{id}",
    params(("id" = i32, Path, description = "Reply ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Reply deleted", body = String),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Reply not found", body = AppError),
    ),
    tag = "forum"
)]
pub async fn delete_reply(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = CommentService::new(db);
    service
        .delete_reply(id, identity.id(), identity.is_admin())
        .await?;
    Ok(ApiResponse::ok("Reply deleted"))
}

#[utoipa::path(
    post,
    path = "/api/v1/forum/comments/{id}/like",
    params(("id" = i32, Path, description = "Comment ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Like toggled", body = LikeResponse),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "forum"
)]
pub async fn toggle_like(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(comment_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(&identity)?;

    let service = CommentService::new(db);
    let (liked, like_count) = service.toggle_like(comment_id, user.id).await?;
    Ok(ApiResponse::ok(LikeResponse { liked, like_count }))
}
