//! Generation job records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::course::CourseId;
use crate::domain::DomainError;

/// Kind of downstream generation work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Narrated audio track for the course content
    CourseAudio,
    /// AI-generated course summary and outline
    CourseSummary,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CourseAudio => write!(f, "course_audio"),
            Self::CourseSummary => write!(f, "course_summary"),
        }
    }
}

/// Lifecycle status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting to be picked up by a worker
    #[default]
    Queued,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A unit of downstream work enqueued when a course is published.
///
/// Workers live outside this service; this side only enqueues and reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    id: String,
    kind: JobKind,
    course_id: CourseId,
    status: JobStatus,
    enqueued_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl GenerationJob {
    /// Enqueue a new job
    pub fn new(kind: JobKind, course_id: CourseId) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            course_id,
            status: JobStatus::Queued,
            enqueued_at: Utc::now(),
            started_at: None,
            finished_at: None,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark the job as picked up. Allowed from `Queued` only.
    pub fn mark_running(&mut self) -> Result<(), DomainError> {
        if self.status != JobStatus::Queued {
            return Err(DomainError::conflict(format!(
                "Job '{}' cannot start from status '{}'",
                self.id, self.status
            )));
        }

        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Mark the job as finished successfully. Allowed from `Running` only.
    pub fn mark_completed(&mut self) -> Result<(), DomainError> {
        if self.status != JobStatus::Running {
            return Err(DomainError::conflict(format!(
                "Job '{}' cannot complete from status '{}'",
                self.id, self.status
            )));
        }

        self.status = JobStatus::Completed;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Mark the job as failed with an error message
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), DomainError> {
        if matches!(self.status, JobStatus::Completed | JobStatus::Failed) {
            return Err(DomainError::conflict(format!(
                "Job '{}' already finished ({})",
                self.id, self.status
            )));
        }

        self.status = JobStatus::Failed;
        self.finished_at = Some(Utc::now());
        self.error = Some(error.into());
        Ok(())
    }

    /// Restore persisted state. Used by repositories when loading rows.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        kind: JobKind,
        course_id: CourseId,
        status: JobStatus,
        enqueued_at: DateTime<Utc>,
        started_at: Option<DateTime<Utc>>,
        finished_at: Option<DateTime<Utc>>,
        error: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            course_id,
            status,
            enqueued_at,
            started_at,
            finished_at,
            error,
        }
    }
}
