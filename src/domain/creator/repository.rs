//! Creator profile repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApprovalStatus, CreatorProfile};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for creator profile storage
#[async_trait]
pub trait CreatorRepository: Send + Sync + Debug {
    /// Get a profile by its ID
    async fn get(&self, id: &str) -> Result<Option<CreatorProfile>, DomainError>;

    /// Get the profile belonging to a user, if any
    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<CreatorProfile>, DomainError>;

    /// Create a new profile
    async fn create(&self, profile: CreatorProfile) -> Result<CreatorProfile, DomainError>;

    /// Update an existing profile
    async fn update(&self, profile: &CreatorProfile) -> Result<CreatorProfile, DomainError>;

    /// List profiles, optionally filtered by status, oldest first
    async fn list(&self, status: Option<ApprovalStatus>)
        -> Result<Vec<CreatorProfile>, DomainError>;
}
