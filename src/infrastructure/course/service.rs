//! Course authoring and catalog service

use std::sync::Arc;

use tracing::info;

use crate::domain::course::{
    validate_category, validate_description, validate_title, validate_token_reward, Course,
    CourseId, CoursePage, CourseRepository, CourseStatus,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for creating a new course draft
#[derive(Debug, Clone)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub token_reward: i64,
}

/// Request for updating a course draft
#[derive(Debug, Clone, Default)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub token_reward: Option<i64>,
}

/// Course service covering creator authoring and the public catalog
#[derive(Debug)]
pub struct CourseService<R: CourseRepository> {
    repository: Arc<R>,
}

impl<R: CourseRepository> CourseService<R> {
    /// Create a new course service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a draft course owned by the given creator
    pub async fn create(
        &self,
        creator_id: &UserId,
        request: CreateCourseRequest,
    ) -> Result<Course, DomainError> {
        validate_title(&request.title).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_description(&request.description)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_category(&request.category)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_token_reward(request.token_reward)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let course = Course::new(
            CourseId::generate(),
            request.title,
            request.description,
            request.category,
            creator_id.clone(),
            request.token_reward,
        );

        let course = self.repository.create(course).await?;
        info!(course_id = %course.id(), creator_id = %creator_id, "Course draft created");
        Ok(course)
    }

    /// Update an editable course owned by the given creator
    pub async fn update(
        &self,
        creator_id: &UserId,
        id: &str,
        request: UpdateCourseRequest,
    ) -> Result<Course, DomainError> {
        if let Some(title) = &request.title {
            validate_title(title).map_err(|e| DomainError::validation(e.to_string()))?;
        }
        if let Some(description) = &request.description {
            validate_description(description)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }
        if let Some(category) = &request.category {
            validate_category(category).map_err(|e| DomainError::validation(e.to_string()))?;
        }
        if let Some(reward) = request.token_reward {
            validate_token_reward(reward).map_err(|e| DomainError::validation(e.to_string()))?;
        }

        let mut course = self.require_owned(creator_id, id).await?;

        if !course.is_editable() {
            return Err(DomainError::conflict(format!(
                "Course '{}' cannot be edited in status '{}'",
                id,
                course.status()
            )));
        }

        course.update_content(
            request.title,
            request.description,
            request.category,
            request.token_reward,
        );

        self.repository.update(&course).await
    }

    /// Submit a course for review
    pub async fn submit(&self, creator_id: &UserId, id: &str) -> Result<Course, DomainError> {
        let mut course = self.require_owned(creator_id, id).await?;

        course.submit()?;
        let course = self.repository.update(&course).await?;

        info!(course_id = %course.id(), "Course submitted for review");
        Ok(course)
    }

    /// List the creator's own courses
    pub async fn list_mine(&self, creator_id: &UserId) -> Result<Vec<Course>, DomainError> {
        self.repository.list_by_creator(creator_id).await
    }

    /// Get a course regardless of status
    pub async fn get(&self, id: &str) -> Result<Option<Course>, DomainError> {
        self.repository.get(&CourseId::new(id)).await
    }

    /// Get a published course for the public catalog
    pub async fn get_published(&self, id: &str) -> Result<Course, DomainError> {
        let course = self
            .repository
            .get(&CourseId::new(id))
            .await?
            .filter(|c| c.is_published())
            .ok_or_else(|| DomainError::not_found(format!("Course '{}' not found", id)))?;

        Ok(course)
    }

    /// Page through the published catalog
    pub async fn list_published(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<CoursePage, DomainError> {
        self.repository
            .list_by_status(CourseStatus::Published, offset, limit)
            .await
    }

    async fn require_owned(&self, creator_id: &UserId, id: &str) -> Result<Course, DomainError> {
        let course = self
            .repository
            .get(&CourseId::new(id))
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Course '{}' not found", id)))?;

        if course.creator_id() != creator_id {
            return Err(DomainError::forbidden(
                "Course belongs to a different creator",
            ));
        }

        Ok(course)
    }
}
