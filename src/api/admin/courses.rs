//! Course moderation admin endpoints

use axum::{
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::api::courses::CourseResponse;
use crate::api::creator::CreateCourseApiRequest;
use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json};
use crate::domain::course::CourseStatus;
use crate::domain::job::GenerationJob;
use crate::infrastructure::course::CreateCourseRequest;

/// Course list filter (`?status=submitted`)
#[derive(Debug, Deserialize)]
pub struct CourseFilter {
    pub status: Option<CourseStatus>,
}

/// List courses response
#[derive(Debug, Serialize)]
pub struct AdminCoursesResponse {
    pub courses: Vec<CourseResponse>,
    pub total: usize,
}

/// Rejection request body
#[derive(Debug, Deserialize, Validate)]
pub struct RejectCourseRequest {
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

/// Generation job response
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: String,
    pub kind: String,
    pub course_id: String,
    pub status: String,
    pub enqueued_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&GenerationJob> for JobResponse {
    fn from(job: &GenerationJob) -> Self {
        Self {
            id: job.id().to_string(),
            kind: job.kind().to_string(),
            course_id: job.course_id().as_str().to_string(),
            status: job.status().to_string(),
            enqueued_at: job.enqueued_at().to_rfc3339(),
            error: job.error().map(String::from),
        }
    }
}

/// Approval response: the published course plus the enqueued jobs
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub course: CourseResponse,
    pub jobs: Vec<JobResponse>,
}

/// GET /api/admin/courses
pub async fn list_courses(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(filter): Query<CourseFilter>,
) -> Result<Envelope<AdminCoursesResponse>, ApiError> {
    debug!(status = ?filter.status, "Admin listing courses");

    let courses = state.admin_service.list_courses(filter.status).await?;

    let responses: Vec<CourseResponse> = courses.iter().map(CourseResponse::from).collect();
    let total = responses.len();

    Ok(Envelope::ok(AdminCoursesResponse {
        courses: responses,
        total,
    }))
}

/// POST /api/admin/courses
///
/// Admins can author courses directly; the draft is owned by the admin and
/// follows the normal submission workflow.
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateCourseApiRequest>,
) -> Result<Envelope<CourseResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let course = state
        .course_service
        .create(
            admin.id(),
            CreateCourseRequest {
                title: request.title,
                description: request.description,
                category: request.category,
                token_reward: request.token_reward,
            },
        )
        .await?;

    Ok(Envelope::created(CourseResponse::from(&course)))
}

/// POST /api/admin/courses/{id}/approve
///
/// Publishes a submitted course and enqueues its generation jobs.
pub async fn approve_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Envelope<ApprovalResponse>, ApiError> {
    debug!(course_id = %id, admin_id = %admin.id(), "Admin approving course");

    let (course, jobs) = state.admin_service.approve_course(admin.id(), &id).await?;

    Ok(Envelope::ok(ApprovalResponse {
        course: CourseResponse::from(&course),
        jobs: jobs.iter().map(JobResponse::from).collect(),
    }))
}

/// POST /api/admin/courses/{id}/reject
pub async fn reject_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<RejectCourseRequest>,
) -> Result<Envelope<CourseResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    debug!(course_id = %id, admin_id = %admin.id(), "Admin rejecting course");

    let course = state
        .admin_service
        .reject_course(admin.id(), &id, &request.reason)
        .await?;

    Ok(Envelope::ok(CourseResponse::from(&course)))
}
