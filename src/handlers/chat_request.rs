use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_admin, require_user};
use crate::models::{ChatRequestModel, Identity, RequestStatus};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::chat_request::{ChatRequestService, NewChatRequest};
use crate::services::email::EmailService;
use crate::services::meeting::MeetingService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChatRequest {
    /// What the requester wants to discuss (1-3000 characters)
    #[validate(length(min = 1, max = 3000))]
    pub content: String,
    /// Requested date (YYYY-MM-DD)
    pub requested_date: NaiveDate,
    /// Requested time (HH:MM:SS)
    pub requested_time: NaiveTime,
    /// Optional attachment reference
    pub attachment: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProposeSlotsRequest {
    /// Alternative slots, each "YYYY-MM-DD HH:MM"
    pub slots: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmSlotRequest {
    /// One of the admin-proposed slots, "YYYY-MM-DD HH:MM"
    pub slot: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestListQuery {
    /// Filter by status: pending, validated or refused
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/chat/requests",
    security(("jwt_token" = [])),
    request_body = CreateChatRequest,
    responses(
        (status = 200, description = "Request submitted", body = ChatRequestModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "chat"
)]
pub async fn create_request(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    identity: Identity,
    Json(payload): Json<CreateChatRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let user = require_user(&identity)?;

    let service = ChatRequestService::new(db);
    let request = service
        .create(
            user,
            NewChatRequest {
                content: payload.content,
                requested_date: payload.requested_date,
                requested_time: payload.requested_time,
                attachment: payload.attachment,
            },
            &email_service,
        )
        .await?;

    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    get,
    path = "/api/v1/chat/requests/mine",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's requests, newest first", body = [ChatRequestModel]),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "chat"
)]
pub async fn list_my_requests(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
) -> AppResult<impl IntoResponse> {
    let user = require_user(&identity)?;

    let service = ChatRequestService::new(db);
    let requests = service.list_for_user(user.id).await?;
    Ok(ApiResponse::ok(requests))
}

#[utoipa::path(
    post,
    path = "/api/v1/chat/requests/{id}/confirm-slot",
    params(("id" = i32, Path, description = "Request ID")),
    security(("jwt_token" = [])),
    request_body = ConfirmSlotRequest,
    responses(
        (status = 200, description = "Slot confirmed", body = ChatRequestModel),
        (status = 400, description = "Slot not among proposals", body = AppError),
        (status = 403, description = "Not the requester", body = AppError),
        (status = 409, description = "Request already settled", body = AppError),
    ),
    tag = "chat"
)]
pub async fn confirm_slot(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(payload): Json<ConfirmSlotRequest>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(&identity)?;

    let service = ChatRequestService::new(db);
    let request = service.confirm_slot(id, user.id, &payload.slot).await?;
    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/chat/requests",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Requests listed", body = PaginatedResponse<ChatRequestModel>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_requests(
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

    let service = ChatRequestService::new(db);
    let (requests, total) = service.list(status, page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        requests, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/chat/requests/{id}",
    params(("id" = i32, Path, description = "Request ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Request retrieved", body = ChatRequestModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Request not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_request(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = ChatRequestService::new(db);
    let request = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/chat/requests/{id}/validate",
    params(("id" = i32, Path, description = "Request ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Request validated", body = ChatRequestModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Request already settled", body = AppError),
    ),
    tag = "admin"
)]
pub async fn validate_request(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    Extension(meeting_service): Extension<MeetingService>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = ChatRequestService::new(db);
    let request = service
        .validate(id, &meeting_service, &email_service)
        .await?;
    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/chat/requests/{id}/refuse",
    params(("id" = i32, Path, description = "Request ID")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Request refused", body = ChatRequestModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Request already settled", body = AppError),
    ),
    tag = "admin"
)]
pub async fn refuse_request(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    identity: Identity,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = ChatRequestService::new(db);
    let request = service.refuse(id, &email_service).await?;
    Ok(ApiResponse::ok(request))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/chat/requests/{id}/propose-slots",
    params(("id" = i32, Path, description = "Request ID")),
    security(("jwt_token" = [])),
    request_body = ProposeSlotsRequest,
    responses(
        (status = 200, description = "Alternative slots recorded", body = ChatRequestModel),
        (status = 400, description = "Invalid slots", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Request already settled", body = AppError),
    ),
    tag = "admin"
)]
pub async fn propose_slots(
    Extension(db): Extension<DatabaseConnection>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(payload): Json<ProposeSlotsRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&identity)?;

    let service = ChatRequestService::new(db);
    let request = service.propose_slots(id, payload.slots).await?;
    Ok(ApiResponse::ok(request))
}
