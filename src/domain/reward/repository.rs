//! Reward ledger repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::RewardEntry;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for the token reward ledger
#[async_trait]
pub trait RewardRepository: Send + Sync + Debug {
    /// Append an entry to the ledger
    async fn append(&self, entry: RewardEntry) -> Result<RewardEntry, DomainError>;

    /// List a user's entries, newest first
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, DomainError>;

    /// Compute a user's balance (credits minus debits)
    async fn balance(&self, user_id: &UserId) -> Result<i64, DomainError>;
}
