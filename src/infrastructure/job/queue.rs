//! Generation job queue
//!
//! Enqueues downstream work when courses are published. Workers that
//! actually run the jobs live in a separate deployment and only share the
//! table.

use std::sync::Arc;

use tracing::info;

use crate::domain::course::CourseId;
use crate::domain::job::{GenerationJob, JobKind, JobRepository, JobStatus};
use crate::domain::DomainError;

/// Enqueue-side view of the generation job queue
#[derive(Debug)]
pub struct JobQueue<R: JobRepository> {
    repository: Arc<R>,
}

impl<R: JobRepository> JobQueue<R> {
    /// Create a new queue over the given repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Enqueue a single job
    pub async fn enqueue(
        &self,
        kind: JobKind,
        course_id: &CourseId,
    ) -> Result<GenerationJob, DomainError> {
        let job = self
            .repository
            .create(GenerationJob::new(kind, course_id.clone()))
            .await?;

        info!(job_id = %job.id(), kind = %job.kind(), course_id = %course_id, "Job enqueued");
        Ok(job)
    }

    /// Enqueue the standard post-publication work for a course
    pub async fn enqueue_publication_jobs(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        let mut jobs = Vec::with_capacity(2);

        for kind in [JobKind::CourseAudio, JobKind::CourseSummary] {
            jobs.push(self.enqueue(kind, course_id).await?);
        }

        Ok(jobs)
    }

    /// List jobs, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<JobStatus>,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        self.repository.list(status).await
    }

    /// List jobs enqueued for a course
    pub async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        self.repository.list_for_course(course_id).await
    }
}
