//! 路由配置

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::http_tracing;
use super::state::AppState;

/// 徽章等级路由
fn tier_routes() -> Router<AppState> {
    Router::new()
        .route("/badges", post(handlers::define_tier))
        .route("/skills/{skill_id}/badges", get(handlers::list_skill_tiers))
}

/// 用户徽章路由，均需要 X-User-Id
fn user_badge_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user/badges",
            post(handlers::assign_badge).get(handlers::list_my_grants),
        )
        .route("/user/badges/{grant_id}", get(handlers::get_my_grant))
        .route(
            "/user/badges/skill/{skill_id}",
            get(handlers::list_my_grants_by_skill),
        )
        .route(
            "/user/badges/{grant_id}/share",
            post(handlers::share_grant),
        )
}

/// 构建完整路由
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let api = Router::new()
        .merge(tier_routes())
        .merge(user_badge_routes());

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .route_layer(middleware::from_fn(http_tracing))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
