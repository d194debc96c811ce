use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_admin, require_user};
use crate::models::{Identity, SubjectModel};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::forum::ForumService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectRequest {
    /// Subject title (1-100 characters)
    #[validate(length(min = 1, max = 100))]
    pub title: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/forum/subjects",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Subjects listed", body = PaginatedResponse<SubjectModel>),
    ),
    tag = "forum"
)]
pub async fn list_subjects(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = ForumService::new(db);
    let (subjects, total) = service.list(page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        subjects, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/forum/subjects/{id}",
    params(("id" = i32, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject retrieved", body = SubjectModel),
        (status = 404, description = "Subject not found", body = AppError),
    ),
    tag = "forum"
)]
pub async fn get_subject(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ForumService::new(db);
    let subject = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(subject))
}

#[utoipa::path(
    post,
    path = "/api/v1/forum/subjects",
    security(("jwt_token" = [])),
    request_body = CreateSubjectRequest,
    responses(
        (status = 200, description = "Subject created", body = SubjectModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "forum"
)]
pub async fn create_subject(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Json(payload): Json<CreateSubjectRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = require_user(&identity)?;

    let service = ForumService::new(db);
    let subject = service.create(user.id, &payload.title).await?;
    Ok(ApiResponse::ok(subject))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/subjects/{id}",
    params(("id" = i32, Path, description = "Subject ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Subject deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Subject not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_subject(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = ForumService::new(db);
    service.delete(id).await?;
    Ok(ApiResponse::ok("Subject deleted"))
}
