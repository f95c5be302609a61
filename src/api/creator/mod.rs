//! Creator endpoints - applications and course authoring

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::api::courses::CourseResponse;
use crate::api::middleware::{RequireCreator, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json};
use crate::domain::creator::CreatorProfile;
use crate::infrastructure::course::{CreateCourseRequest, UpdateCourseRequest};

/// Create the creator router
pub fn create_creator_router() -> Router<AppState> {
    Router::new()
        .route("/apply", post(apply))
        .route("/application", get(my_application))
        .route("/courses", get(list_my_courses).post(create_course))
        .route("/courses/{id}", put(update_course))
        .route("/courses/{id}/submit", post(submit_course))
}

/// Creator application request
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

/// Creator profile response
#[derive(Debug, Serialize)]
pub struct CreatorProfileResponse {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<&CreatorProfile> for CreatorProfileResponse {
    fn from(profile: &CreatorProfile) -> Self {
        Self {
            id: profile.id().to_string(),
            user_id: profile.user_id().as_str().to_string(),
            display_name: profile.display_name().to_string(),
            bio: profile.bio().map(String::from),
            status: profile.status().to_string(),
            created_at: profile.created_at().to_rfc3339(),
        }
    }
}

/// Course creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseApiRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub token_reward: i64,
}

/// Course update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseApiRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub token_reward: Option<i64>,
}

/// List courses response
#[derive(Debug, Serialize)]
pub struct CreatorCoursesResponse {
    pub courses: Vec<CourseResponse>,
    pub total: usize,
}

/// POST /api/creator/apply
///
/// Any authenticated user can apply to become a creator.
pub async fn apply(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<ApplyRequest>,
) -> Result<Envelope<CreatorProfileResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let profile = state
        .admin_service
        .apply_for_creator(user.id(), &request.display_name, request.bio)
        .await?;

    Ok(Envelope::created(CreatorProfileResponse::from(&profile)))
}

/// GET /api/creator/application
///
/// The caller's own application status.
pub async fn my_application(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Envelope<CreatorProfileResponse>, ApiError> {
    let profile = state
        .admin_service
        .my_application(user.id())
        .await?
        .ok_or_else(|| ApiError::not_found("No creator application on file"))?;

    Ok(Envelope::ok(CreatorProfileResponse::from(&profile)))
}

/// GET /api/creator/courses
pub async fn list_my_courses(
    State(state): State<AppState>,
    RequireCreator(user): RequireCreator,
) -> Result<Envelope<CreatorCoursesResponse>, ApiError> {
    let courses = state.course_service.list_mine(user.id()).await?;

    let responses: Vec<CourseResponse> = courses.iter().map(CourseResponse::from).collect();
    let total = responses.len();

    Ok(Envelope::ok(CreatorCoursesResponse {
        courses: responses,
        total,
    }))
}

/// POST /api/creator/courses
pub async fn create_course(
    State(state): State<AppState>,
    RequireCreator(user): RequireCreator,
    Json(request): Json<CreateCourseApiRequest>,
) -> Result<Envelope<CourseResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    debug!(creator_id = %user.id(), title = %request.title, "Creating course draft");

    let course = state
        .course_service
        .create(
            user.id(),
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

/// PUT /api/creator/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    RequireCreator(user): RequireCreator,
    Path(id): Path<String>,
    Json(request): Json<UpdateCourseApiRequest>,
) -> Result<Envelope<CourseResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let course = state
        .course_service
        .update(
            user.id(),
            &id,
            UpdateCourseRequest {
                title: request.title,
                description: request.description,
                category: request.category,
                token_reward: request.token_reward,
            },
        )
        .await?;

    Ok(Envelope::ok(CourseResponse::from(&course)))
}

/// POST /api/creator/courses/{id}/submit
pub async fn submit_course(
    State(state): State<AppState>,
    RequireCreator(user): RequireCreator,
    Path(id): Path<String>,
) -> Result<Envelope<CourseResponse>, ApiError> {
    debug!(creator_id = %user.id(), course_id = %id, "Submitting course for review");

    let course = state.course_service.submit(user.id(), &id).await?;

    Ok(Envelope::ok(CourseResponse::from(&course)))
}
