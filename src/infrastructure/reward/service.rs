//! Token reward ledger service

use std::sync::Arc;

use tracing::info;

use crate::domain::reward::{RewardEntry, RewardRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// A user's ledger with its computed balance
#[derive(Debug, Clone)]
pub struct Ledger {
    pub entries: Vec<RewardEntry>,
    pub balance: i64,
}

/// Reward ledger service
#[derive(Debug)]
pub struct RewardService<R: RewardRepository> {
    repository: Arc<R>,
}

impl<R: RewardRepository> RewardService<R> {
    /// Create a new reward service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Credit tokens to a user
    pub async fn credit(
        &self,
        user_id: &UserId,
        amount: i64,
        reason: &str,
        reference_id: Option<String>,
    ) -> Result<RewardEntry, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation("Credit amount must be positive"));
        }

        let entry = self
            .repository
            .append(RewardEntry::credit(
                user_id.clone(),
                amount,
                reason,
                reference_id,
            ))
            .await?;

        info!(user_id = %user_id, amount, reason, "Tokens credited");
        Ok(entry)
    }

    /// Debit tokens from a user. Fails if the balance would go negative.
    pub async fn debit(
        &self,
        user_id: &UserId,
        amount: i64,
        reason: &str,
        reference_id: Option<String>,
    ) -> Result<RewardEntry, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation("Debit amount must be positive"));
        }

        let balance = self.repository.balance(user_id).await?;

        if balance < amount {
            return Err(DomainError::conflict(format!(
                "Insufficient balance: have {}, need {}",
                balance, amount
            )));
        }

        let entry = self
            .repository
            .append(RewardEntry::debit(
                user_id.clone(),
                amount,
                reason,
                reference_id,
            ))
            .await?;

        info!(user_id = %user_id, amount, reason, "Tokens debited");
        Ok(entry)
    }

    /// Fetch a user's ledger with its balance
    pub async fn ledger(&self, user_id: &UserId) -> Result<Ledger, DomainError> {
        let entries = self.repository.list_for_user(user_id).await?;
        let balance = self.repository.balance(user_id).await?;

        Ok(Ledger { entries, balance })
    }
}
