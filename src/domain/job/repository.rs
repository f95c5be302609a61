//! Generation job repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{GenerationJob, JobStatus};
use crate::domain::course::CourseId;
use crate::domain::DomainError;

/// Repository trait for the generation job queue
#[async_trait]
pub trait JobRepository: Send + Sync + Debug {
    /// Get a job by ID
    async fn get(&self, id: &str) -> Result<Option<GenerationJob>, DomainError>;

    /// Enqueue a job
    async fn create(&self, job: GenerationJob) -> Result<GenerationJob, DomainError>;

    /// Persist a status update
    async fn update(&self, job: &GenerationJob) -> Result<(), DomainError>;

    /// List jobs, optionally filtered by status, newest first
    async fn list(&self, status: Option<JobStatus>) -> Result<Vec<GenerationJob>, DomainError>;

    /// List jobs for a course
    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<GenerationJob>, DomainError>;
}
