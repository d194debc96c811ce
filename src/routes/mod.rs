use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use crate::middleware::visit::visit_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    // Anonymous visit counting only applies to the unauthenticated surface.
    let public = public_routes(&rate_limit_config).layer(middleware::from_fn(visit_middleware));
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(public).merge(protected)
}

/// Credential endpoints, tightly rate limited.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/register", routing::post(handlers::auth::register))
        .route("/auth/login", routing::post(handlers::auth::login))
        .route(
            "/auth/forgot-password",
            routing::post(handlers::auth::forgot_password),
        )
        .route(
            "/auth/reset-password",
            routing::post(handlers::auth::reset_password),
        );

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Public routes: forum reads, the devis form, profile photos.
fn public_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route(
            "/forum/subjects",
            routing::get(handlers::forum::list_subjects),
        )
        .route(
            "/forum/subjects/{id}",
            routing::get(handlers::forum::get_subject),
        )
        .route(
            "/forum/subjects/{id}/comments",
            routing::get(handlers::comment::list_comments),
        )
        .route(
            "/users/{id}/photo",
            routing::get(handlers::user::get_profile_photo),
        )
        .route("/devis", routing::post(handlers::devis::create_devis));

    with_optional_rate_limit(router, config.enabled, config.public)
}

/// Authenticated routes; admin-only access is checked in the handlers.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::auth::get_current_user))
        .route("/auth/logout", routing::post(handlers::auth::logout))
        .route(
            "/auth/password",
            routing::put(handlers::auth::change_password),
        )
        // Users
        .route("/users/{id}", routing::get(handlers::user::get_profile))
        .route(
            "/users/me/photo",
            routing::put(handlers::user::upload_profile_photo),
        )
        // Forum writes
        .route(
            "/forum/subjects",
            routing::post(handlers::forum::create_subject),
        )
        .route(
            "/forum/subjects/{id}/comments",
            routing::post(handlers::comment::create_comment),
        )
        .route(
            "/forum/comments/{id}",
            routing::put(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
        .route(
            "/forum/comments/{id}/replies",
            routing::post(handlers::comment::create_reply),
        )
        .route(
            "/forum/comments/{id}/like",
            routing::post(handlers::comment::toggle_like),
        )
        .route(
            "/forum/replies/{id}",
            routing::put(handlers::comment::update_reply)
                .delete(handlers::comment::delete_reply),
        )
        // Chat requests
        .route(
            "/chat/requests",
            routing::post(handlers::chat_request::create_request),
        )
        .route(
            "/chat/requests/mine",
            routing::get(handlers::chat_request::list_my_requests),
        )
        .route(
            "/chat/requests/{id}/confirm-slot",
            routing::post(handlers::chat_request::confirm_slot),
        )
        // Admin
        .route("/admin/stats", routing::get(handlers::admin::get_stats))
        .route("/admin/users", routing::get(handlers::admin::list_users))
        .route(
            "/admin/users/{id}",
            routing::delete(handlers::admin::delete_user),
        )
        .route(
            "/admin/users/{id}/ban",
            routing::post(handlers::admin::ban_user),
        )
        .route(
            "/admin/users/{id}/unban",
            routing::post(handlers::admin::unban_user),
        )
        .route(
            "/admin/subjects/{id}",
            routing::delete(handlers::forum::delete_subject),
        )
        .route(
            "/admin/chat/requests",
            routing::get(handlers::chat_request::list_requests),
        )
        .route(
            "/admin/chat/requests/{id}",
            routing::get(handlers::chat_request::get_request),
        )
        .route(
            "/admin/chat/requests/{id}/validate",
            routing::post(handlers::chat_request::validate_request),
        )
        .route(
            "/admin/chat/requests/{id}/refuse",
            routing::post(handlers::chat_request::refuse_request),
        )
        .route(
            "/admin/chat/requests/{id}/propose-slots",
            routing::post(handlers::chat_request::propose_slots),
        )
        .route("/admin/devis", routing::get(handlers::devis::list_devis))
        .route(
            "/admin/devis/{id}",
            routing::get(handlers::devis::get_devis),
        )
        .route(
            "/admin/devis/{id}/validate",
            routing::post(handlers::devis::validate_devis),
        )
        .route(
            "/admin/devis/{id}/refuse",
            routing::post(handlers::devis::refuse_devis),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
