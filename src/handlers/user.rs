use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserResponse;
use crate::middleware::auth::require_user;
use crate::models::Identity;
use crate::response::ApiResponse;
use crate::services::user::UserService;
use axum::{
    extract::{Multipart, Path},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    _identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let user = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

/// Upload and set the caller's profile photo.
/// PUT /users/me/photo (multipart form: field "file")
#[utoipa::path(
    put,
    path = "/api/v1/users/me/photo",
    security(("jwt_token" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile photo updated", body = String),
        (status = 400, description = "Invalid image", body = AppError),
        (status = 413, description = "File too large", body = AppError),
    ),
    tag = "users"
)]
pub async fn upload_profile_photo(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let user = require_user(&identity)?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

    let service = UserService::new(db);
    service
        .set_profile_photo(user.id, &data, &content_type)
        .await?;

    Ok(ApiResponse::ok("Profile photo updated"))
}

/// Serve a user's stored profile photo thumbnail.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/photo",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "PNG thumbnail bytes"),
        (status = 404, description = "No photo for this user", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_profile_photo(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let bytes = service.get_profile_photo(id).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
        bytes,
    ))
}
