//! Reward ledger repository implementations

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::reward::{EntryKind, RewardEntry, RewardRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of RewardRepository
#[derive(Debug, Clone)]
pub struct PostgresRewardRepository {
    pool: PgPool,
}

impl PostgresRewardRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RewardRepository for PostgresRewardRepository {
    async fn append(&self, entry: RewardEntry) -> Result<RewardEntry, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO reward_entries (id, user_id, kind, amount, reason, reference_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id())
        .bind(entry.user_id().as_str())
        .bind(kind_to_str(entry.kind()))
        .bind(entry.amount())
        .bind(entry.reason())
        .bind(entry.reference_id())
        .bind(entry.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to append ledger entry: {}", e)))?;

        Ok(entry)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, kind, amount, reason, reference_id, created_at
            FROM reward_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list ledger entries: {}", e)))?;

        let mut entries = Vec::with_capacity(rows.len());

        for row in rows {
            entries.push(row_to_entry(&row)?);
        }

        Ok(entries)
    }

    async fn balance(&self, user_id: &UserId) -> Result<i64, DomainError> {
        let balance: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(CASE WHEN kind = 'credit' THEN amount ELSE -amount END)
            FROM reward_entries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to compute balance: {}", e)))?;

        Ok(balance.unwrap_or(0))
    }
}

fn row_to_entry(row: &sqlx::postgres::PgRow) -> Result<RewardEntry, DomainError> {
    let user_id: String = row.get("user_id");
    let kind: String = row.get("kind");

    let user_id = UserId::new(&user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(RewardEntry::restore(
        row.get("id"),
        user_id,
        str_to_kind(&kind)?,
        row.get("amount"),
        row.get("reason"),
        row.get("reference_id"),
        row.get("created_at"),
    ))
}

fn kind_to_str(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Credit => "credit",
        EntryKind::Debit => "debit",
    }
}

fn str_to_kind(s: &str) -> Result<EntryKind, DomainError> {
    match s {
        "credit" => Ok(EntryKind::Credit),
        "debit" => Ok(EntryKind::Debit),
        other => Err(DomainError::storage(format!(
            "Invalid ledger entry kind in database: {}",
            other
        ))),
    }
}

/// In-memory implementation of RewardRepository for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryRewardRepository {
    entries: Arc<RwLock<Vec<RewardEntry>>>,
}

impl InMemoryRewardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RewardRepository for InMemoryRewardRepository {
    async fn append(&self, entry: RewardEntry) -> Result<RewardEntry, DomainError> {
        let mut entries = self.entries.write().await;
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, DomainError> {
        let entries = self.entries.read().await;

        let mut result: Vec<RewardEntry> = entries
            .iter()
            .filter(|e| e.user_id() == user_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn balance(&self, user_id: &UserId) -> Result<i64, DomainError> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .filter(|e| e.user_id() == user_id)
            .map(|e| e.signed_amount())
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_balance() {
        let repo = InMemoryRewardRepository::new();
        let user = UserId::generate();

        repo.append(RewardEntry::credit(user.clone(), 100, "completion", None))
            .await
            .unwrap();
        repo.append(RewardEntry::debit(user.clone(), 30, "purchase", None))
            .await
            .unwrap();

        assert_eq!(repo.balance(&user).await.unwrap(), 70);
    }

    #[tokio::test]
    async fn test_balance_is_per_user() {
        let repo = InMemoryRewardRepository::new();
        let alice = UserId::generate();
        let bob = UserId::generate();

        repo.append(RewardEntry::credit(alice.clone(), 100, "completion", None))
            .await
            .unwrap();

        assert_eq!(repo.balance(&alice).await.unwrap(), 100);
        assert_eq!(repo.balance(&bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let repo = InMemoryRewardRepository::new();
        let user = UserId::generate();

        repo.append(RewardEntry::credit(user.clone(), 10, "a", None))
            .await
            .unwrap();
        repo.append(RewardEntry::credit(user.clone(), 20, "b", None))
            .await
            .unwrap();
        repo.append(RewardEntry::credit(UserId::generate(), 30, "c", None))
            .await
            .unwrap();

        let entries = repo.list_for_user(&user).await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(str_to_kind(kind_to_str(EntryKind::Credit)).unwrap(), EntryKind::Credit);
        assert_eq!(str_to_kind(kind_to_str(EntryKind::Debit)).unwrap(), EntryKind::Debit);
        assert!(str_to_kind("bogus").is_err());
    }
}
