//! Generation job inspection endpoints

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::api::admin::courses::JobResponse;
use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope};
use crate::domain::job::JobStatus;

/// Job list filter (`?status=queued`)
#[derive(Debug, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
}

/// List jobs response
#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobResponse>,
    pub total: usize,
}

/// GET /api/admin/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(filter): Query<JobFilter>,
) -> Result<Envelope<JobsResponse>, ApiError> {
    let jobs = state.admin_service.list_jobs(filter.status).await?;

    let responses: Vec<JobResponse> = jobs.iter().map(JobResponse::from).collect();
    let total = responses.len();

    Ok(Envelope::ok(JobsResponse {
        jobs: responses,
        total,
    }))
}
