//! Public course catalog endpoints

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, PageInfo, Pagination};
use crate::domain::course::Course;

use super::certificates::CertificateResponse;

/// Create the public course router
pub fn create_course_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/{id}", get(get_course))
        .route("/{id}/complete", post(complete_course))
}

/// Course response
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub creator_id: String,
    pub token_reward: i64,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id().as_str().to_string(),
            title: course.title().to_string(),
            description: course.description().to_string(),
            category: course.category().to_string(),
            creator_id: course.creator_id().as_str().to_string(),
            token_reward: course.token_reward(),
            status: course.status().to_string(),
            created_at: course.created_at().to_rfc3339(),
            submitted_at: course.submitted_at().map(|t| t.to_rfc3339()),
            published_at: course.published_at().map(|t| t.to_rfc3339()),
            rejection_reason: course.rejection_reason().map(String::from),
        }
    }
}

/// Paged catalog response
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseResponse>,
    pub page_info: PageInfo,
}

/// GET /api/courses
///
/// Published courses, newest first, paginated.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Envelope<CourseListResponse>, ApiError> {
    let page = state
        .course_service
        .list_published(pagination.offset(), pagination.per_page())
        .await?;

    Ok(Envelope::ok(CourseListResponse {
        courses: page.courses.iter().map(CourseResponse::from).collect(),
        page_info: PageInfo::new(&pagination, page.total),
    }))
}

/// GET /api/courses/{id}
///
/// A single published course. Unpublished courses are indistinguishable
/// from missing ones.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<CourseResponse>, ApiError> {
    let course = state.course_service.get_published(&id).await?;

    Ok(Envelope::ok(CourseResponse::from(&course)))
}

/// POST /api/courses/{id}/complete
///
/// Records completion for the authenticated user: issues a certificate and
/// credits the course's token reward.
pub async fn complete_course(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Envelope<CertificateResponse>, ApiError> {
    let certificate = state.certificate_service.issue(user.id(), &id).await?;

    Ok(Envelope::created(CertificateResponse::from(&certificate)))
}
