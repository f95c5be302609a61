//! Course repository implementations

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::course::{Course, CourseId, CoursePage, CourseRepository, CourseStatus};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of CourseRepository
#[derive(Debug, Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COURSE_COLUMNS: &str = "id, title, description, category, creator_id, token_reward, \
                              status, created_at, updated_at, submitted_at, published_at, \
                              approved_by, rejection_reason";

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn get(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get course: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_course(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, course: Course) -> Result<Course, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, category, creator_id, token_reward,
                                 status, created_at, updated_at, submitted_at, published_at,
                                 approved_by, rejection_reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(course.id().as_str())
        .bind(course.title())
        .bind(course.description())
        .bind(course.category())
        .bind(course.creator_id().as_str())
        .bind(course.token_reward())
        .bind(status_to_str(course.status()))
        .bind(course.created_at())
        .bind(course.updated_at())
        .bind(course.submitted_at())
        .bind(course.published_at())
        .bind(course.approved_by().map(|id| id.as_str().to_string()))
        .bind(course.rejection_reason())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("duplicate key") {
                DomainError::conflict(format!(
                    "Course with ID '{}' already exists",
                    course.id().as_str()
                ))
            } else {
                DomainError::storage(format!("Failed to create course: {}", e))
            }
        })?;

        Ok(course)
    }

    async fn update(&self, course: &Course) -> Result<Course, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET title = $2, description = $3, category = $4, token_reward = $5,
                status = $6, updated_at = $7, submitted_at = $8, published_at = $9,
                approved_by = $10, rejection_reason = $11
            WHERE id = $1
            "#,
        )
        .bind(course.id().as_str())
        .bind(course.title())
        .bind(course.description())
        .bind(course.category())
        .bind(course.token_reward())
        .bind(status_to_str(course.status()))
        .bind(course.updated_at())
        .bind(course.submitted_at())
        .bind(course.published_at())
        .bind(course.approved_by().map(|id| id.as_str().to_string()))
        .bind(course.rejection_reason())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update course: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Course '{}' not found",
                course.id().as_str()
            )));
        }

        Ok(course.clone())
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete course: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_status(
        &self,
        status: CourseStatus,
        offset: usize,
        limit: usize,
    ) -> Result<CoursePage, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE status = $1")
            .bind(status_to_str(status))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count courses: {}", e)))?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM courses WHERE status = $1 \
             ORDER BY created_at DESC OFFSET $2 LIMIT $3",
            COURSE_COLUMNS
        ))
        .bind(status_to_str(status))
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list courses: {}", e)))?;

        let mut courses = Vec::with_capacity(rows.len());

        for row in rows {
            courses.push(row_to_course(&row)?);
        }

        Ok(CoursePage {
            courses,
            total: total as usize,
        })
    }

    async fn list(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM courses WHERE status = $1 ORDER BY created_at DESC",
                    COURSE_COLUMNS
                ))
                .bind(status_to_str(s))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM courses ORDER BY created_at DESC",
                    COURSE_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list courses: {}", e)))?;

        let mut courses = Vec::with_capacity(rows.len());

        for row in rows {
            courses.push(row_to_course(&row)?);
        }

        Ok(courses)
    }

    async fn list_by_creator(&self, creator_id: &UserId) -> Result<Vec<Course>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM courses WHERE creator_id = $1 ORDER BY created_at DESC",
            COURSE_COLUMNS
        ))
        .bind(creator_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list creator courses: {}", e)))?;

        let mut courses = Vec::with_capacity(rows.len());

        for row in rows {
            courses.push(row_to_course(&row)?);
        }

        Ok(courses)
    }
}

fn row_to_course(row: &sqlx::postgres::PgRow) -> Result<Course, DomainError> {
    let id: String = row.get("id");
    let creator_id: String = row.get("creator_id");
    let status: String = row.get("status");
    let approved_by: Option<String> = row.get("approved_by");

    let creator_id = UserId::new(&creator_id)
        .map_err(|e| DomainError::storage(format!("Invalid creator ID in database: {}", e)))?;

    let approved_by = match approved_by {
        Some(s) => Some(
            UserId::new(&s).map_err(|e| {
                DomainError::storage(format!("Invalid approver ID in database: {}", e))
            })?,
        ),
        None => None,
    };

    let course = Course::new(
        CourseId::new(id),
        row.get::<String, _>("title"),
        row.get::<String, _>("description"),
        row.get::<String, _>("category"),
        creator_id,
        row.get("token_reward"),
    );

    Ok(course.restore(
        str_to_status(&status)?,
        row.get("created_at"),
        row.get("updated_at"),
        row.get("submitted_at"),
        row.get("published_at"),
        approved_by,
        row.get("rejection_reason"),
    ))
}

fn status_to_str(status: CourseStatus) -> &'static str {
    match status {
        CourseStatus::Draft => "draft",
        CourseStatus::Submitted => "submitted",
        CourseStatus::Published => "published",
        CourseStatus::Rejected => "rejected",
    }
}

fn str_to_status(s: &str) -> Result<CourseStatus, DomainError> {
    match s {
        "draft" => Ok(CourseStatus::Draft),
        "submitted" => Ok(CourseStatus::Submitted),
        "published" => Ok(CourseStatus::Published),
        "rejected" => Ok(CourseStatus::Rejected),
        other => Err(DomainError::storage(format!(
            "Invalid course status in database: {}",
            other
        ))),
    }
}

/// In-memory implementation of CourseRepository for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: Arc<RwLock<HashMap<String, Course>>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn get(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let courses = self.courses.read().await;
        Ok(courses.get(id.as_str()).cloned())
    }

    async fn create(&self, course: Course) -> Result<Course, DomainError> {
        let mut courses = self.courses.write().await;
        let id = course.id().as_str().to_string();

        if courses.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Course with ID '{}' already exists",
                id
            )));
        }

        courses.insert(id, course.clone());
        Ok(course)
    }

    async fn update(&self, course: &Course) -> Result<Course, DomainError> {
        let mut courses = self.courses.write().await;
        let id = course.id().as_str().to_string();

        if !courses.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "Course '{}' not found",
                id
            )));
        }

        courses.insert(id, course.clone());
        Ok(course.clone())
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, DomainError> {
        let mut courses = self.courses.write().await;
        Ok(courses.remove(id.as_str()).is_some())
    }

    async fn list_by_status(
        &self,
        status: CourseStatus,
        offset: usize,
        limit: usize,
    ) -> Result<CoursePage, DomainError> {
        let courses = self.courses.read().await;

        let mut matching: Vec<Course> = courses
            .values()
            .filter(|c| c.status() == status)
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let total = matching.len();
        let page = matching.into_iter().skip(offset).take(limit).collect();

        Ok(CoursePage {
            courses: page,
            total,
        })
    }

    async fn list(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, DomainError> {
        let courses = self.courses.read().await;

        let mut result: Vec<Course> = courses
            .values()
            .filter(|c| status.map_or(true, |s| c.status() == s))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn list_by_creator(&self, creator_id: &UserId) -> Result<Vec<Course>, DomainError> {
        let courses = self.courses.read().await;

        let mut result: Vec<Course> = courses
            .values()
            .filter(|c| c.creator_id() == creator_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }
}
