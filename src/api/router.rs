use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::admin;
use super::auth;
use super::certificates;
use super::courses;
use super::creator;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware};
use super::rewards;
use super::state::AppState;

/// Create a minimal router without state (for testing/backward compatibility)
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::api_health))
        .nest("/auth", auth::create_auth_router())
        .nest("/courses", courses::create_course_router())
        .nest("/creator", creator::create_creator_router())
        .nest("/admin", admin::create_admin_router())
        .nest("/certificates", certificates::create_certificate_router())
        .nest("/rewards", rewards::create_reward_router());

    Router::new()
        // Probe endpoints outside the /api envelope
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", api)
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
