use crate::{
    services::visit::VisitService,
    utils::cookie::{build_cookie, extract_cookie, VISITOR_ID_COOKIE},
};
use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
    Extension,
};
use sea_orm::DatabaseConnection;

/// Visitor cookies live for one year.
const VISITOR_COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// Anonymous visit tracking middleware.
///
/// Assigns each browser a random visitor id cookie on first contact and
/// records the visit off the request path. Authentication is never consulted;
/// the id says nothing about who the visitor is.
pub async fn visit_middleware(
    Extension(db): Extension<DatabaseConnection>,
    request: Request,
    next: Next,
) -> Response {
    let existing = extract_cookie(request.headers(), VISITOR_ID_COOKIE);
    let visitor_id = existing
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    {
        let visitor_id = visitor_id.clone();
        tokio::spawn(async move {
            if let Err(e) = VisitService::new(db).record(&visitor_id).await {
                tracing::warn!("Failed to record visit: {e}");
            }
        });
    }

    let mut response = next.run(request).await;

    if existing.is_none() {
        let cookie = build_cookie(VISITOR_ID_COOKIE, &visitor_id, VISITOR_COOKIE_MAX_AGE);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
