//! OTP challenge repository implementations

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::otp::{OtpChallenge, OtpPurpose, OtpRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of OtpRepository
#[derive(Debug, Clone)]
pub struct PostgresOtpRepository {
    pool: PgPool,
}

impl PostgresOtpRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpRepository for PostgresOtpRepository {
    async fn put(&self, challenge: OtpChallenge) -> Result<OtpChallenge, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        // A fresh challenge supersedes any live one for the same pair
        sqlx::query(
            "DELETE FROM otp_challenges WHERE email = $1 AND purpose = $2 AND consumed_at IS NULL",
        )
        .bind(challenge.email())
        .bind(purpose_to_str(challenge.purpose()))
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to supersede challenge: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO otp_challenges (id, email, code_hash, purpose, expires_at,
                                        attempts, created_at, consumed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(challenge.id())
        .bind(challenge.email())
        .bind(challenge.code_hash())
        .bind(purpose_to_str(challenge.purpose()))
        .bind(challenge.expires_at())
        .bind(challenge.attempts() as i32)
        .bind(challenge.created_at())
        .bind(challenge.consumed_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to store challenge: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit challenge: {}", e)))?;

        Ok(challenge)
    }

    async fn get(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpChallenge>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, code_hash, purpose, expires_at, attempts, created_at, consumed_at
            FROM otp_challenges
            WHERE email = $1 AND purpose = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(purpose_to_str(purpose))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get challenge: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_challenge(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, challenge: &OtpChallenge) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE otp_challenges SET attempts = $2, consumed_at = $3 WHERE id = $1",
        )
        .bind(challenge.id())
        .bind(challenge.attempts() as i32)
        .bind(challenge.consumed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update challenge: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "OTP challenge '{}' not found",
                challenge.id()
            )));
        }

        Ok(())
    }

    async fn purge_stale(&self) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM otp_challenges WHERE consumed_at IS NOT NULL OR expires_at < NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to purge challenges: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_challenge(row: &sqlx::postgres::PgRow) -> Result<OtpChallenge, DomainError> {
    let purpose: String = row.get("purpose");
    let attempts: i32 = row.get("attempts");

    Ok(OtpChallenge::restore(
        row.get("id"),
        row.get("email"),
        row.get("code_hash"),
        str_to_purpose(&purpose)?,
        row.get("expires_at"),
        attempts as u32,
        row.get("created_at"),
        row.get("consumed_at"),
    ))
}

fn purpose_to_str(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::Signup => "signup",
        OtpPurpose::PasswordReset => "password_reset",
    }
}

fn str_to_purpose(s: &str) -> Result<OtpPurpose, DomainError> {
    match s {
        "signup" => Ok(OtpPurpose::Signup),
        "password_reset" => Ok(OtpPurpose::PasswordReset),
        other => Err(DomainError::storage(format!(
            "Invalid OTP purpose in database: {}",
            other
        ))),
    }
}

/// In-memory implementation of OtpRepository for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryOtpRepository {
    challenges: Arc<RwLock<HashMap<(String, String), OtpChallenge>>>,
}

impl InMemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(email: &str, purpose: OtpPurpose) -> (String, String) {
        (email.to_string(), purpose_to_str(purpose).to_string())
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn put(&self, challenge: OtpChallenge) -> Result<OtpChallenge, DomainError> {
        let mut challenges = self.challenges.write().await;
        challenges.insert(
            Self::key(challenge.email(), challenge.purpose()),
            challenge.clone(),
        );
        Ok(challenge)
    }

    async fn get(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpChallenge>, DomainError> {
        let challenges = self.challenges.read().await;
        Ok(challenges.get(&Self::key(email, purpose)).cloned())
    }

    async fn update(&self, challenge: &OtpChallenge) -> Result<(), DomainError> {
        let mut challenges = self.challenges.write().await;
        let key = Self::key(challenge.email(), challenge.purpose());

        match challenges.get(&key) {
            Some(existing) if existing.id() == challenge.id() => {
                challenges.insert(key, challenge.clone());
                Ok(())
            }
            _ => Err(DomainError::not_found(format!(
                "OTP challenge '{}' not found",
                challenge.id()
            ))),
        }
    }

    async fn purge_stale(&self) -> Result<u64, DomainError> {
        let mut challenges = self.challenges.write().await;
        let before = challenges.len();

        challenges.retain(|_, c| c.consumed_at().is_none() && !c.is_expired());

        Ok((before - challenges.len()) as u64)
    }
}
