use crate::{
    error::AppError,
    models::{identity, Admin, Identity, IdentityKind, User},
    utils::{
        cookie::{extract_cookie, ACCESS_TOKEN_COOKIE},
        jwt::decode_jwt,
    },
};
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response, Extension};
use sea_orm::{DatabaseConnection, EntityTrait};

/// JWT authentication middleware.
///
/// Verifies the token, resolves the subject against the matching account
/// store, rejects currently banned users, and adds the resolved `Identity`
/// to request extensions.
pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Prefer Authorization: Bearer, fallback to HttpOnly cookie.
    let token = extract_bearer_token(&headers)
        .or_else(|| extract_cookie(&headers, ACCESS_TOKEN_COOKIE))
        .ok_or(AppError::Unauthorized)?;

    let claims = decode_jwt(&token).map_err(|_| AppError::Unauthorized)?;

    let (kind, id) = identity::parse_subject(&claims.sub).ok_or(AppError::Unauthorized)?;

    let identity = match kind {
        IdentityKind::User => {
            let user = User::find_by_id(id)
                .one(&db)
                .await?
                .ok_or(AppError::Unauthorized)?;

            // A ban issued after the token was minted takes effect here.
            let now = chrono::Utc::now().naive_utc();
            if user.is_currently_banned(now) {
                return Err(AppError::Forbidden);
            }
            Identity::User(user)
        }
        IdentityKind::Admin => {
            let admin = Admin::find_by_id(id)
                .one(&db)
                .await?
                .ok_or(AppError::Unauthorized)?;
            Identity::Admin(admin)
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Reject non-admin callers.
pub fn require_admin(identity: &Identity) -> crate::error::AppResult<i32> {
    match identity {
        Identity::Admin(admin) => Ok(admin.id),
        Identity::User(_) => Err(AppError::Forbidden),
    }
}

/// Reject callers that are not regular users (admins have no forum profile,
/// date of birth or ban state).
pub fn require_user(identity: &Identity) -> crate::error::AppResult<&crate::models::UserModel> {
    match identity {
        Identity::User(user) => Ok(user),
        Identity::Admin(_) => Err(AppError::Forbidden),
    }
}

/// Extractor for Identity from request extensions.
use axum::extract::FromRequestParts;

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
