//! Creator profile entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Review status of a creator application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting admin review
    #[default]
    Pending,
    /// Approved - the user may author courses
    Approved,
    /// Application declined
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A user's application to become a content creator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorProfile {
    id: String,
    user_id: UserId,
    /// Public author name shown on courses
    display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
    status: ApprovalStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Admin who reviewed the application
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewed_by: Option<UserId>,
}

impl CreatorProfile {
    /// Create a new pending application
    pub fn new(user_id: UserId, display_name: impl Into<String>, bio: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            display_name: display_name.into(),
            bio,
            status: ApprovalStatus::Pending,
            created_at: now,
            updated_at: now,
            reviewed_by: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn reviewed_by(&self) -> Option<&UserId> {
        self.reviewed_by.as_ref()
    }

    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    /// Approve the application. Allowed from `Pending` only.
    pub fn approve(&mut self, reviewed_by: UserId) -> Result<(), DomainError> {
        self.review(ApprovalStatus::Approved, reviewed_by)
    }

    /// Reject the application. Allowed from `Pending` only.
    pub fn reject(&mut self, reviewed_by: UserId) -> Result<(), DomainError> {
        self.review(ApprovalStatus::Rejected, reviewed_by)
    }

    fn review(&mut self, status: ApprovalStatus, reviewed_by: UserId) -> Result<(), DomainError> {
        if self.status != ApprovalStatus::Pending {
            return Err(DomainError::conflict(format!(
                "Creator application '{}' was already reviewed ({})",
                self.id, self.status
            )));
        }

        self.status = status;
        self.reviewed_by = Some(reviewed_by);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Restore persisted state. Used by repositories when loading rows.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        user_id: UserId,
        display_name: String,
        bio: Option<String>,
        status: ApprovalStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        reviewed_by: Option<UserId>,
    ) -> Self {
        Self {
            id,
            user_id,
            display_name,
            bio,
            status,
            created_at,
            updated_at,
            reviewed_by,
        }
    }
}
