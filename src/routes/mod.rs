use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use crate::services::upload::MAX_UPLOAD_BODY;
use axum::{extract::DefaultBodyLimit, middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api", api_routes())
}

/// Every API route requires a valid access token.
fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    read_routes(&rate_limit_config)
        .merge(write_routes(&rate_limit_config))
        .layer(middleware::from_fn(auth_middleware))
}

/// Listings, detail fetches and lookups.
fn read_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/requests", routing::get(handlers::request::get_requests))
        .route(
            "/requests/{id}/media",
            routing::get(handlers::media::list_media),
        )
        .route(
            "/complaints",
            routing::get(handlers::complaint::list_complaints),
        )
        // Lookups
        .route("/statuses", routing::get(handlers::lookup::list_statuses))
        .route("/towns", routing::get(handlers::lookup::list_towns))
        .route(
            "/towns/{id}/subtowns",
            routing::get(handlers::lookup::list_subtowns),
        )
        .route(
            "/complaint-types",
            routing::get(handlers::lookup::list_complaint_types),
        )
        .route(
            "/complaint-types/{id}/subtypes",
            routing::get(handlers::lookup::list_complaint_subtypes),
        );

    with_optional_rate_limit(router, config.enabled, config.read)
}

/// Creates, updates, deletes and uploads.
fn write_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route(
            "/requests",
            routing::post(handlers::request::create_request)
                .put(handlers::request::update_request),
        )
        .route(
            "/requests/{id}/media",
            routing::post(handlers::media::upload_media)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY)),
        )
        .route(
            "/complaints",
            routing::post(handlers::complaint::create_complaint)
                .delete(handlers::complaint::delete_complaint),
        );

    with_optional_rate_limit(router, config.enabled, config.write)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    match GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
    {
        Some(governor_conf) => router.layer(GovernorLayer::new(governor_conf)),
        None => {
            tracing::warn!(?rule, "Invalid rate limit rule, group left unlimited");
            router
        }
    }
}
