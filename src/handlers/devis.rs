use crate::error::{AppError, AppResult};
use crate::handlers::chat_request::RequestListQuery;
use crate::middleware::auth::require_admin;
use crate::models::{DevisRequestModel, Identity, RequestStatus};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::devis::{DevisService, NewDevisRequest};
use crate::services::email::EmailService;
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
pub struct CreateDevisRequest {
    #[validate(length(min = 1, max = 30))]
    pub last_name: String,
    #[validate(length(min = 1, max = 30))]
    pub first_name: String,
    #[validate(length(min = 5, max = 30))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    /// Kind of project the quote is for
    #[validate(length(min = 1, max = 50))]
    pub project_type: String,
    /// Project description (1-5000 characters)
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// Public endpoint: no account needed to ask for a quote.
#[utoipa::path(
    post,
    path = "/api/v1/devis",
    request_body = CreateDevisRequest,
    responses(
        (status = 200, description = "Quote request submitted", body = DevisRequestModel),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "devis"
)]
pub async fn create_devis(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    Json(payload): Json<CreateDevisRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = DevisService::new(db);
    let request = service
        .create(
            NewDevisRequest {
                last_name: payload.last_name,
                first_name: payload.first_name,
                phone: payload.phone,
                email: payload.email,
                project_type: payload.project_type,
                content: payload.content,
            },
            &email_service,
        )
        .await?;

    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/devis",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Quote requests listed", body = PaginatedResponse<DevisRequestModel>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_devis(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Query(query): Query<RequestListQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let status = query
        .status
        .as_deref()
        .map(RequestStatus::parse)
        .transpose()?;
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = DevisService::new(db);
    let (requests, total) = service.list(status, page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        requests, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/devis/{id}",
    params(("id" = i32, Path, description = "Quote request ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Quote request retrieved", body = DevisRequestModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Quote request not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_devis(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = DevisService::new(db);
    let request = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/devis/{id}/validate",
    params(("id" = i32, Path, description = "Quote request ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Quote request validated", body = DevisRequestModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Quote request already settled", body = AppError),
    ),
    tag = "admin"
)]
pub async fn validate_devis(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = DevisService::new(db);
    let request = service.validate(id).await?;
    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/devis/{id}/refuse",
    params(("id" = i32, Path, description = "Quote request ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Quote request refused", body = DevisRequestModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Quote request already settled", body = AppError),
    ),
    tag = "admin"
)]
pub async fn refuse_devis(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = DevisService::new(db);
    let request = service.refuse(id).await?;
    Ok(ApiResponse::ok(request))
}
