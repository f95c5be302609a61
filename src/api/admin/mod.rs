//! Admin API endpoints

pub mod courses;
pub mod creators;
pub mod jobs;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

/// Create the admin router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route("/courses/{id}/approve", post(courses::approve_course))
        .route("/courses/{id}/reject", post(courses::reject_course))
        .route("/creators", get(creators::list_applications))
        .route("/creators/{id}/approve", post(creators::approve_creator))
        .route("/creators/{id}/reject", post(creators::reject_creator))
        .route("/jobs", get(jobs::list_jobs))
}
