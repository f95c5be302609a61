//! Generation job repository implementations

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::course::CourseId;
use crate::domain::job::{GenerationJob, JobKind, JobRepository, JobStatus};
use crate::domain::DomainError;

/// PostgreSQL implementation of JobRepository
#[derive(Debug, Clone)]
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const JOB_COLUMNS: &str = "id, kind, course_id, status, enqueued_at, \
                           started_at, finished_at, error";

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn get(&self, id: &str) -> Result<Option<GenerationJob>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM generation_jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get job: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_job(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, job: GenerationJob) -> Result<GenerationJob, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO generation_jobs (id, kind, course_id, status, enqueued_at,
                                         started_at, finished_at, error)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id())
        .bind(kind_to_str(job.kind()))
        .bind(job.course_id().as_str())
        .bind(status_to_str(job.status()))
        .bind(job.enqueued_at())
        .bind(job.started_at())
        .bind(job.finished_at())
        .bind(job.error())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to enqueue job: {}", e)))?;

        Ok(job)
    }

    async fn update(&self, job: &GenerationJob) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE generation_jobs
            SET status = $2, started_at = $3, finished_at = $4, error = $5
            WHERE id = $1
            "#,
        )
        .bind(job.id())
        .bind(status_to_str(job.status()))
        .bind(job.started_at())
        .bind(job.finished_at())
        .bind(job.error())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update job: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Job '{}' not found",
                job.id()
            )));
        }

        Ok(())
    }

    async fn list(
        &self,
        status: Option<JobStatus>,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM generation_jobs WHERE status = $1 ORDER BY enqueued_at DESC",
                    JOB_COLUMNS
                ))
                .bind(status_to_str(s))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM generation_jobs ORDER BY enqueued_at DESC",
                    JOB_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list jobs: {}", e)))?;

        let mut jobs = Vec::with_capacity(rows.len());

        for row in rows {
            jobs.push(row_to_job(&row)?);
        }

        Ok(jobs)
    }

    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM generation_jobs WHERE course_id = $1 ORDER BY enqueued_at DESC",
            JOB_COLUMNS
        ))
        .bind(course_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list course jobs: {}", e)))?;

        let mut jobs = Vec::with_capacity(rows.len());

        for row in rows {
            jobs.push(row_to_job(&row)?);
        }

        Ok(jobs)
    }
}

fn row_to_job(row: &sqlx::postgres::PgRow) -> Result<GenerationJob, DomainError> {
    let kind: String = row.get("kind");
    let status: String = row.get("status");
    let course_id: String = row.get("course_id");

    Ok(GenerationJob::restore(
        row.get("id"),
        str_to_kind(&kind)?,
        CourseId::new(course_id),
        str_to_status(&status)?,
        row.get("enqueued_at"),
        row.get("started_at"),
        row.get("finished_at"),
        row.get("error"),
    ))
}

fn kind_to_str(kind: JobKind) -> &'static str {
    match kind {
        JobKind::CourseAudio => "course_audio",
        JobKind::CourseSummary => "course_summary",
    }
}

fn str_to_kind(s: &str) -> Result<JobKind, DomainError> {
    match s {
        "course_audio" => Ok(JobKind::CourseAudio),
        "course_summary" => Ok(JobKind::CourseSummary),
        other => Err(DomainError::storage(format!(
            "Invalid job kind in database: {}",
            other
        ))),
    }
}

fn status_to_str(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Queued => "queued",
        JobStatus::Running => "running",
        JobStatus::Completed => "completed",
        JobStatus::Failed => "failed",
    }
}

fn str_to_status(s: &str) -> Result<JobStatus, DomainError> {
    match s {
        "queued" => Ok(JobStatus::Queued),
        "running" => Ok(JobStatus::Running),
        "completed" => Ok(JobStatus::Completed),
        "failed" => Ok(JobStatus::Failed),
        other => Err(DomainError::storage(format!(
            "Invalid job status in database: {}",
            other
        ))),
    }
}

/// In-memory implementation of JobRepository for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<RwLock<HashMap<String, GenerationJob>>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn get(&self, id: &str) -> Result<Option<GenerationJob>, DomainError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(id).cloned())
    }

    async fn create(&self, job: GenerationJob) -> Result<GenerationJob, DomainError> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id().to_string(), job.clone());
        Ok(job)
    }

    async fn update(&self, job: &GenerationJob) -> Result<(), DomainError> {
        let mut jobs = self.jobs.write().await;

        if !jobs.contains_key(job.id()) {
            return Err(DomainError::not_found(format!(
                "Job '{}' not found",
                job.id()
            )));
        }

        jobs.insert(job.id().to_string(), job.clone());
        Ok(())
    }

    async fn list(
        &self,
        status: Option<JobStatus>,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        let jobs = self.jobs.read().await;

        let mut result: Vec<GenerationJob> = jobs
            .values()
            .filter(|j| status.map_or(true, |s| j.status() == s))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.enqueued_at().cmp(&a.enqueued_at()));
        Ok(result)
    }

    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        let jobs = self.jobs.read().await;

        let mut result: Vec<GenerationJob> = jobs
            .values()
            .filter(|j| j.course_id() == course_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.enqueued_at().cmp(&a.enqueued_at()));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list_for_course() {
        let repo = InMemoryJobRepository::new();
        let course = CourseId::generate();

        repo.create(GenerationJob::new(JobKind::CourseAudio, course.clone()))
            .await
            .unwrap();
        repo.create(GenerationJob::new(JobKind::CourseSummary, course.clone()))
            .await
            .unwrap();
        repo.create(GenerationJob::new(
            JobKind::CourseAudio,
            CourseId::generate(),
        ))
        .await
        .unwrap();

        let jobs = repo.list_for_course(&course).await.unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let repo = InMemoryJobRepository::new();

        let mut running = GenerationJob::new(JobKind::CourseAudio, CourseId::generate());
        running.mark_running().unwrap();
        repo.create(running).await.unwrap();
        repo.create(GenerationJob::new(JobKind::CourseSummary, CourseId::generate()))
            .await
            .unwrap();

        let queued = repo.list(Some(JobStatus::Queued)).await.unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].kind(), JobKind::CourseSummary);
    }

    #[test]
    fn test_kind_and_status_roundtrip() {
        for kind in [JobKind::CourseAudio, JobKind::CourseSummary] {
            assert_eq!(str_to_kind(kind_to_str(kind)).unwrap(), kind);
        }

        for status in [
            JobStatus::Queued,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(str_to_status(status_to_str(status)).unwrap(), status);
        }
    }
}
