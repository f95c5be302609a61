//! One-time password challenge entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// What the OTP is proving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Verifying a fresh signup
    Signup,
    /// Authorizing a password reset
    PasswordReset,
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signup => write!(f, "signup"),
            Self::PasswordReset => write!(f, "password_reset"),
        }
    }
}

/// A pending OTP challenge for an email address.
///
/// The plain code is never stored; only its SHA-256 hash. At most one live
/// challenge exists per (email, purpose) - issuing a new one supersedes the
/// previous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    id: String,
    email: String,
    /// Hash of the code, in the generator's `sha256$...` format
    code_hash: String,
    purpose: OtpPurpose,
    expires_at: DateTime<Utc>,
    /// Failed verification attempts so far
    attempts: u32,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    consumed_at: Option<DateTime<Utc>>,
}

impl OtpChallenge {
    /// Create a new challenge valid for `ttl_minutes`
    pub fn new(
        email: impl Into<String>,
        code_hash: impl Into<String>,
        purpose: OtpPurpose,
        ttl_minutes: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            code_hash: code_hash.into(),
            purpose,
            expires_at: now + Duration::minutes(ttl_minutes),
            attempts: 0,
            created_at: now,
            consumed_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn code_hash(&self) -> &str {
        &self.code_hash
    }

    pub fn purpose(&self) -> OtpPurpose {
        self.purpose
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn consumed_at(&self) -> Option<DateTime<Utc>> {
        self.consumed_at
    }

    /// Check if the challenge has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the challenge can still be verified
    pub fn is_live(&self, max_attempts: u32) -> bool {
        self.consumed_at.is_none() && !self.is_expired() && self.attempts < max_attempts
    }

    /// Record a failed verification attempt
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Mark the challenge as successfully consumed
    pub fn consume(&mut self) {
        self.consumed_at = Some(Utc::now());
    }

    /// Restore persisted state. Used by repositories when loading rows.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        email: String,
        code_hash: String,
        purpose: OtpPurpose,
        expires_at: DateTime<Utc>,
        attempts: u32,
        created_at: DateTime<Utc>,
        consumed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            code_hash,
            purpose,
            expires_at,
            attempts,
            created_at,
            consumed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge() -> OtpChallenge {
        OtpChallenge::new("learner@example.com", "sha256$abc", OtpPurpose::Signup, 10)
    }

    #[test]
    fn test_new_challenge_is_live() {
        let c = challenge();
        assert!(c.is_live(5));
        assert!(!c.is_expired());
        assert_eq!(c.attempts(), 0);
    }

    #[test]
    fn test_expired_challenge() {
        let c = OtpChallenge::new("learner@example.com", "sha256$abc", OtpPurpose::Signup, -1);
        assert!(c.is_expired());
        assert!(!c.is_live(5));
    }

    #[test]
    fn test_attempt_exhaustion() {
        let mut c = challenge();

        for _ in 0..5 {
            c.record_attempt();
        }

        assert_eq!(c.attempts(), 5);
        assert!(!c.is_live(5));
    }

    #[test]
    fn test_consumed_challenge_is_dead() {
        let mut c = challenge();
        c.consume();

        assert!(c.consumed_at().is_some());
        assert!(!c.is_live(5));
    }

    #[test]
    fn test_purpose_display() {
        assert_eq!(OtpPurpose::Signup.to_string(), "signup");
        assert_eq!(OtpPurpose::PasswordReset.to_string(), "password_reset");
    }
}
