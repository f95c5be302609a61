//! Creator application moderation endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::creator::CreatorProfileResponse;
use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope};
use crate::domain::creator::ApprovalStatus;

/// Application list filter (`?status=pending`)
#[derive(Debug, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<ApprovalStatus>,
}

/// List applications response
#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<CreatorProfileResponse>,
    pub total: usize,
}

/// GET /api/admin/creators
pub async fn list_applications(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(filter): Query<ApplicationFilter>,
) -> Result<Envelope<ApplicationsResponse>, ApiError> {
    debug!(status = ?filter.status, "Admin listing creator applications");

    let applications = state.admin_service.list_applications(filter.status).await?;

    let responses: Vec<CreatorProfileResponse> = applications
        .iter()
        .map(CreatorProfileResponse::from)
        .collect();
    let total = responses.len();

    Ok(Envelope::ok(ApplicationsResponse {
        applications: responses,
        total,
    }))
}

/// POST /api/admin/creators/{id}/approve
///
/// Approves the application and promotes the applicant to the creator role.
pub async fn approve_creator(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Envelope<CreatorProfileResponse>, ApiError> {
    debug!(profile_id = %id, admin_id = %admin.id(), "Admin approving creator");

    let profile = state.admin_service.approve_creator(admin.id(), &id).await?;

    Ok(Envelope::ok(CreatorProfileResponse::from(&profile)))
}

/// POST /api/admin/creators/{id}/reject
pub async fn reject_creator(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Envelope<CreatorProfileResponse>, ApiError> {
    debug!(profile_id = %id, admin_id = %admin.id(), "Admin rejecting creator");

    let profile = state.admin_service.reject_creator(admin.id(), &id).await?;

    Ok(Envelope::ok(CreatorProfileResponse::from(&profile)))
}
