//! Token reward ledger entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Tokens granted to the user
    Credit,
    /// Tokens spent by the user
    Debit,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credit => write!(f, "credit"),
            Self::Debit => write!(f, "debit"),
        }
    }
}

/// An append-only token ledger record.
///
/// Amounts are always positive; the kind carries the sign. A user's balance
/// is the sum of credits minus the sum of debits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEntry {
    id: String,
    user_id: UserId,
    kind: EntryKind,
    amount: i64,
    /// Human-readable cause, e.g. "course completion"
    reason: String,
    /// Related record (certificate or course ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl RewardEntry {
    /// Create a credit entry
    pub fn credit(
        user_id: UserId,
        amount: i64,
        reason: impl Into<String>,
        reference_id: Option<String>,
    ) -> Self {
        Self::new(user_id, EntryKind::Credit, amount, reason, reference_id)
    }

    /// Create a debit entry
    pub fn debit(
        user_id: UserId,
        amount: i64,
        reason: impl Into<String>,
        reference_id: Option<String>,
    ) -> Self {
        Self::new(user_id, EntryKind::Debit, amount, reason, reference_id)
    }

    fn new(
        user_id: UserId,
        kind: EntryKind,
        amount: i64,
        reason: impl Into<String>,
        reference_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            kind,
            amount,
            reason: reason.into(),
            reference_id,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The signed contribution of this entry to the balance
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            EntryKind::Credit => self.amount,
            EntryKind::Debit => -self.amount,
        }
    }

    /// Restore persisted state. Used by repositories when loading rows.
    pub fn restore(
        id: String,
        user_id: UserId,
        kind: EntryKind,
        amount: i64,
        reason: String,
        reference_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            amount,
            reason,
            reference_id,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_entry() {
        let entry = RewardEntry::credit(UserId::generate(), 50, "course completion", None);

        assert_eq!(entry.kind(), EntryKind::Credit);
        assert_eq!(entry.amount(), 50);
        assert_eq!(entry.signed_amount(), 50);
    }

    #[test]
    fn test_debit_entry() {
        let entry = RewardEntry::debit(UserId::generate(), 30, "badge purchase", None);

        assert_eq!(entry.kind(), EntryKind::Debit);
        assert_eq!(entry.signed_amount(), -30);
    }
}
