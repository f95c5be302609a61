//! Course entity and approval state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Course identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random course ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Course lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    /// Being authored, not visible outside the creator
    #[default]
    Draft,
    /// Awaiting admin review
    Submitted,
    /// Live in the public catalog
    Published,
    /// Returned to the creator with a reason
    Rejected,
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Submitted => write!(f, "submitted"),
            Self::Published => write!(f, "published"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Course entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    category: String,
    /// The authoring creator
    creator_id: UserId,
    /// Tokens credited to a learner on completion
    token_reward: i64,
    status: CourseStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<DateTime<Utc>>,
    /// Admin who approved the course
    #[serde(skip_serializing_if = "Option::is_none")]
    approved_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
}

impl Course {
    /// Create a new draft course
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        creator_id: UserId,
        token_reward: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            title: title.into(),
            description: description.into(),
            category: category.into(),
            creator_id,
            token_reward,
            status: CourseStatus::Draft,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            published_at: None,
            approved_by: None,
            rejection_reason: None,
        }
    }

    // Getters

    pub fn id(&self) -> &CourseId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn token_reward(&self) -> i64 {
        self.token_reward
    }

    pub fn status(&self) -> CourseStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn approved_by(&self) -> Option<&UserId> {
        self.approved_by.as_ref()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Check if the course is editable by its creator
    pub fn is_editable(&self) -> bool {
        matches!(self.status, CourseStatus::Draft | CourseStatus::Rejected)
    }

    /// Check if the course is visible in the public catalog
    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    // Transitions

    /// Submit the course for review. Allowed from `Draft` and `Rejected`.
    pub fn submit(&mut self) -> Result<(), DomainError> {
        if !self.is_editable() {
            return Err(DomainError::conflict(format!(
                "Course '{}' cannot be submitted from status '{}'",
                self.id, self.status
            )));
        }

        self.status = CourseStatus::Submitted;
        self.submitted_at = Some(Utc::now());
        self.rejection_reason = None;
        self.touch();
        Ok(())
    }

    /// Publish the course. Allowed from `Submitted` only.
    pub fn publish(&mut self, approved_by: UserId) -> Result<(), DomainError> {
        if self.status != CourseStatus::Submitted {
            return Err(DomainError::conflict(format!(
                "Course '{}' cannot be published from status '{}'",
                self.id, self.status
            )));
        }

        self.status = CourseStatus::Published;
        self.published_at = Some(Utc::now());
        self.approved_by = Some(approved_by);
        self.touch();
        Ok(())
    }

    /// Reject the course with a reason. Allowed from `Submitted` only.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        if self.status != CourseStatus::Submitted {
            return Err(DomainError::conflict(format!(
                "Course '{}' cannot be rejected from status '{}'",
                self.id, self.status
            )));
        }

        self.status = CourseStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        self.touch();
        Ok(())
    }

    // Mutators

    /// Update the editable fields. Callers must check `is_editable` first.
    pub fn update_content(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        category: Option<String>,
        token_reward: Option<i64>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(reward) = token_reward {
            self.token_reward = reward;
        }
        self.touch();
    }

    /// Restore persisted state. Used by repositories when loading rows.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        mut self,
        status: CourseStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        submitted_at: Option<DateTime<Utc>>,
        published_at: Option<DateTime<Utc>>,
        approved_by: Option<UserId>,
        rejection_reason: Option<String>,
    ) -> Self {
        self.status = status;
        self.created_at = created_at;
        self.updated_at = updated_at;
        self.submitted_at = submitted_at;
        self.published_at = published_at;
        self.approved_by = approved_by;
        self.rejection_reason = rejection_reason;
        self
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> UserId {
        UserId::generate()
    }

    fn admin() -> UserId {
        UserId::generate()
    }

    fn draft_course() -> Course {
        Course::new(
            CourseId::generate(),
            "Intro to Rust",
            "Ownership without tears",
            "programming",
            creator(),
            50,
        )
    }

    #[test]
    fn test_new_course_is_draft() {
        let course = draft_course();

        assert_eq!(course.status(), CourseStatus::Draft);
        assert!(course.is_editable());
        assert!(!course.is_published());
        assert!(course.submitted_at().is_none());
    }

    #[test]
    fn test_submit_from_draft() {
        let mut course = draft_course();

        course.submit().unwrap();
        assert_eq!(course.status(), CourseStatus::Submitted);
        assert!(course.submitted_at().is_some());
        assert!(!course.is_editable());
    }

    #[test]
    fn test_submit_twice_is_conflict() {
        let mut course = draft_course();

        course.submit().unwrap();
        assert!(course.submit().is_err());
    }

    #[test]
    fn test_publish_from_submitted() {
        let mut course = draft_course();
        let reviewer = admin();

        course.submit().unwrap();
        course.publish(reviewer.clone()).unwrap();

        assert_eq!(course.status(), CourseStatus::Published);
        assert!(course.is_published());
        assert!(course.published_at().is_some());
        assert_eq!(course.approved_by(), Some(&reviewer));
    }

    #[test]
    fn test_publish_from_draft_is_conflict() {
        let mut course = draft_course();

        assert!(course.publish(admin()).is_err());
        assert_eq!(course.status(), CourseStatus::Draft);
    }

    #[test]
    fn test_reject_and_resubmit() {
        let mut course = draft_course();

        course.submit().unwrap();
        course.reject("needs more depth").unwrap();

        assert_eq!(course.status(), CourseStatus::Rejected);
        assert_eq!(course.rejection_reason(), Some("needs more depth"));
        assert!(course.is_editable());

        // A rejected course can be fixed and resubmitted
        course.submit().unwrap();
        assert_eq!(course.status(), CourseStatus::Submitted);
        assert!(course.rejection_reason().is_none());
    }

    #[test]
    fn test_reject_published_is_conflict() {
        let mut course = draft_course();

        course.submit().unwrap();
        course.publish(admin()).unwrap();

        assert!(course.reject("too late").is_err());
        assert_eq!(course.status(), CourseStatus::Published);
    }

    #[test]
    fn test_update_content() {
        let mut course = draft_course();

        course.update_content(Some("Advanced Rust".to_string()), None, None, Some(75));

        assert_eq!(course.title(), "Advanced Rust");
        assert_eq!(course.description(), "Ownership without tears");
        assert_eq!(course.token_reward(), 75);
    }
}
