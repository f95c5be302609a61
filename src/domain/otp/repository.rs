//! OTP challenge repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{OtpChallenge, OtpPurpose};
use crate::domain::DomainError;

/// Repository trait for OTP challenge storage
#[async_trait]
pub trait OtpRepository: Send + Sync + Debug {
    /// Store a challenge, replacing any live challenge for the same
    /// (email, purpose) pair
    async fn put(&self, challenge: OtpChallenge) -> Result<OtpChallenge, DomainError>;

    /// Get the latest challenge for an email and purpose
    async fn get(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpChallenge>, DomainError>;

    /// Persist attempt counter / consumption updates
    async fn update(&self, challenge: &OtpChallenge) -> Result<(), DomainError>;

    /// Remove expired and consumed challenges, returning how many were purged
    async fn purge_stale(&self) -> Result<u64, DomainError>;
}
