use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserResponse;
use crate::middleware::auth::require_admin;
use crate::models::Identity;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::admin::{AdminService, AdminStats};
use crate::services::email::EmailService;
use crate::services::moderation::ModerationService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = AdminStats),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_stats(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = AdminService::new(db);
    let stats = service.get_stats().await?;
    Ok(ApiResponse::ok(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Users listed", body = PaginatedResponse<UserResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_users(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Query(query): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = AdminService::new(db);
    let (users, total) = service.list_users(page, per_page).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        users, total, page, per_page,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = AdminService::new(db);
    service.delete_user(id).await?;
    Ok(ApiResponse::ok("User deleted"))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/ban",
    params(("id" = i32, Path, description = "User ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "User banned", body = UserResponse),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn ban_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = ModerationService::new(db);
    let user = service.ban(id, &email_service).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/unban",
    params(("id" = i32, Path, description = "User ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Ban lifted", body = UserResponse),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn unban_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = ModerationService::new(db);
    let user = service.unban(id, &email_service).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}
