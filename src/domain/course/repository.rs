//! Course repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Course, CourseId, CourseStatus};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// A page of courses plus the total match count
#[derive(Debug, Clone)]
pub struct CoursePage {
    pub courses: Vec<Course>,
    pub total: usize,
}

/// Repository trait for course storage
#[async_trait]
pub trait CourseRepository: Send + Sync + Debug {
    /// Get a course by ID
    async fn get(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Create a new course
    async fn create(&self, course: Course) -> Result<Course, DomainError>;

    /// Update an existing course
    async fn update(&self, course: &Course) -> Result<Course, DomainError>;

    /// Delete a course
    async fn delete(&self, id: &CourseId) -> Result<bool, DomainError>;

    /// List courses by status, newest first, with offset/limit paging
    async fn list_by_status(
        &self,
        status: CourseStatus,
        offset: usize,
        limit: usize,
    ) -> Result<CoursePage, DomainError>;

    /// List all courses, optionally filtered by status, newest first
    async fn list(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, DomainError>;

    /// List courses authored by a creator, newest first
    async fn list_by_creator(&self, creator_id: &UserId) -> Result<Vec<Course>, DomainError>;
}
