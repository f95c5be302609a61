//! Authentication service
//!
//! Orchestrates signup, OTP verification, login and password resets.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::otp::{OtpChallenge, OtpPurpose, OtpRepository};
use crate::domain::user::{
    validate_email, validate_password, validate_username, User, UserId, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::email::OtpMailer;
use crate::infrastructure::otp::OtpGenerator;
use crate::infrastructure::user::PasswordHasher;

use super::rate_limiter::{RateLimitConfig, RateLimiter};

/// Tunables for OTP issuance and verification
#[derive(Debug, Clone, Copy)]
pub struct OtpSettings {
    /// Challenge lifetime in minutes
    pub ttl_minutes: i64,
    /// Verification attempts allowed per challenge
    pub max_attempts: u32,
    /// Throttle applied to issue/verify/login keys
    pub rate_limit: RateLimitConfig,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            ttl_minutes: 10,
            max_attempts: 5,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Request for creating a new account
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Authentication service
pub struct AuthService<R: UserRepository, O: OtpRepository, H: PasswordHasher> {
    users: Arc<R>,
    challenges: Arc<O>,
    hasher: Arc<H>,
    mailer: Arc<dyn OtpMailer>,
    generator: OtpGenerator,
    limiter: Arc<RateLimiter>,
    settings: OtpSettings,
}

impl<R: UserRepository, O: OtpRepository, H: PasswordHasher> Debug for AuthService<R, O, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("settings", &self.settings)
            .finish()
    }
}

impl<R: UserRepository, O: OtpRepository, H: PasswordHasher> AuthService<R, O, H> {
    /// Create a new auth service
    pub fn new(
        users: Arc<R>,
        challenges: Arc<O>,
        hasher: Arc<H>,
        mailer: Arc<dyn OtpMailer>,
        limiter: Arc<RateLimiter>,
        settings: OtpSettings,
    ) -> Self {
        Self {
            users,
            challenges,
            hasher,
            mailer,
            generator: OtpGenerator::default(),
            limiter,
            settings,
        }
    }

    /// Register a new account and email a signup OTP.
    /// The account stays in pending-verification until the OTP is confirmed.
    pub async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_username(&request.username)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.users.email_exists(&request.email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                request.email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(
            UserId::generate(),
            &request.email,
            &request.username,
            password_hash,
        );

        let user = self.users.create(user).await?;

        self.issue_challenge(user.email(), OtpPurpose::Signup)
            .await?;

        info!(user_id = %user.id(), "New signup, verification OTP sent");
        Ok(user)
    }

    /// Re-send the signup OTP for a pending account
    pub async fn resend_signup_otp(&self, email: &str) -> Result<(), DomainError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("No pending signup for this email"))?;

        if user.is_active() {
            return Err(DomainError::conflict("Account is already verified"));
        }

        self.issue_challenge(email, OtpPurpose::Signup).await
    }

    /// Verify a signup OTP and activate the account
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<User, DomainError> {
        self.throttle("verify", email).await?;
        self.consume_challenge(email, code, OtpPurpose::Signup)
            .await?;

        let mut user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("No pending signup for this email"))?;

        user.verify();
        let user = self.users.update(&user).await?;

        // Successful verification clears the throttle state
        self.limiter.reset(&key("verify", email)).await;
        self.limiter.reset(&key("otp", email)).await;

        info!(user_id = %user.id(), "Account verified");
        Ok(user)
    }

    /// Authenticate with email and password.
    /// Returns `None` on any credential failure so callers cannot
    /// distinguish unknown accounts from wrong passwords.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, DomainError> {
        self.throttle("login", email).await?;

        let user = match self.users.get_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !user.is_active() {
            debug!(user_id = %user.id(), "Login rejected: account not active");
            return Ok(None);
        }

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        self.users.record_login(user.id()).await?;
        self.limiter.reset(&key("login", email)).await;

        self.users.get(user.id()).await
    }

    /// Start a password reset by emailing an OTP.
    /// Always succeeds for well-formed emails so account existence is not
    /// revealed.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;

        match self.users.get_by_email(email).await? {
            Some(user) if user.is_active() => {
                self.issue_challenge(email, OtpPurpose::PasswordReset).await
            }
            _ => {
                debug!("Password reset requested for unknown or inactive email");
                Ok(())
            }
        }
    }

    /// Complete a password reset with the emailed OTP
    pub async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        self.throttle("verify", email).await?;
        self.consume_challenge(email, code, OtpPurpose::PasswordReset)
            .await?;

        let mut user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("No account for this email"))?;

        let new_hash = self.hasher.hash(new_password)?;
        user.set_password_hash(new_hash);
        self.users.update(&user).await?;

        self.limiter.reset(&key("verify", email)).await;
        self.limiter.reset(&key("otp", email)).await;

        info!(user_id = %user.id(), "Password reset completed");
        Ok(())
    }

    /// Generate, store and email a challenge for the given purpose
    async fn issue_challenge(&self, email: &str, purpose: OtpPurpose) -> Result<(), DomainError> {
        self.throttle("otp", email).await?;

        let otp = self.generator.generate();
        let challenge = OtpChallenge::new(email, otp.hash, purpose, self.settings.ttl_minutes);

        self.challenges.put(challenge).await?;
        self.mailer.send_otp(email, &otp.code, purpose).await?;

        debug!(purpose = %purpose, "OTP challenge issued");
        Ok(())
    }

    /// Verify a code against the live challenge and consume it
    async fn consume_challenge(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError> {
        let mut challenge = self
            .challenges
            .get(email, purpose)
            .await?
            .ok_or_else(|| DomainError::unauthorized("Invalid or expired code"))?;

        if !challenge.is_live(self.settings.max_attempts) {
            return Err(DomainError::unauthorized("Invalid or expired code"));
        }

        if !self.generator.verify_code(code, challenge.code_hash()) {
            challenge.record_attempt();
            self.challenges.update(&challenge).await?;
            return Err(DomainError::unauthorized("Invalid or expired code"));
        }

        challenge.consume();
        self.challenges.update(&challenge).await?;
        Ok(())
    }

    async fn throttle(&self, scope: &str, email: &str) -> Result<(), DomainError> {
        let result = self
            .limiter
            .check_and_record(&key(scope, email), &self.settings.rate_limit)
            .await;

        if !result.allowed {
            return Err(DomainError::rate_limited(format!(
                "Too many attempts. Try again in {} seconds",
                result.reset_in_seconds
            )));
        }

        Ok(())
    }
}

fn key(scope: &str, email: &str) -> String {
    format!("{}:{}", scope, email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::email::MockOtpMailer;
    use crate::infrastructure::otp::InMemoryOtpRepository;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository};

    type TestAuthService = AuthService<InMemoryUserRepository, InMemoryOtpRepository, Argon2Hasher>;

    struct Harness {
        service: TestAuthService,
        challenges: Arc<InMemoryOtpRepository>,
        generator: OtpGenerator,
    }

    fn harness_with(settings: OtpSettings) -> Harness {
        let mut mailer = MockOtpMailer::new();
        mailer.expect_send_otp().returning(|_, _, _| Ok(()));

        let challenges = Arc::new(InMemoryOtpRepository::new());
        let service = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            challenges.clone(),
            Arc::new(Argon2Hasher::new()),
            Arc::new(mailer),
            Arc::new(RateLimiter::new()),
            settings,
        );

        Harness {
            service,
            challenges,
            generator: OtpGenerator::default(),
        }
    }

    fn harness() -> Harness {
        harness_with(OtpSettings::default())
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            username: "learner".to_string(),
            password: "secure_password123".to_string(),
        }
    }

    /// Plant a challenge with a known code so tests can verify it
    async fn plant_code(h: &Harness, email: &str, code: &str, purpose: OtpPurpose) {
        let challenge = OtpChallenge::new(email, h.generator.hash_code(code), purpose, 10);
        h.challenges.put(challenge).await.unwrap();
    }

    #[tokio::test]
    async fn test_signup_creates_pending_user() {
        let h = harness();

        let user = h.service.signup(signup_request("a@example.com")).await.unwrap();

        assert!(!user.is_active());
        assert!(h
            .challenges
            .get("a@example.com", OtpPurpose::Signup)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_is_conflict() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();

        let result = h.service.signup(signup_request("a@example.com")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_input() {
        let h = harness();

        let mut bad_email = signup_request("not-an-email");
        bad_email.email = "not-an-email".to_string();
        assert!(h.service.signup(bad_email).await.is_err());

        let mut short_password = signup_request("a@example.com");
        short_password.password = "short".to_string();
        assert!(h.service.signup(short_password).await.is_err());
    }

    #[tokio::test]
    async fn test_verify_otp_activates_user() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;

        let user = h.service.verify_otp("a@example.com", "123456").await.unwrap();
        assert!(user.is_active());
    }

    #[tokio::test]
    async fn test_verify_otp_wrong_code() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;

        let result = h.service.verify_otp("a@example.com", "999999").await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));

        // Failed attempt was recorded
        let challenge = h
            .challenges
            .get("a@example.com", OtpPurpose::Signup)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(challenge.attempts(), 1);
    }

    #[tokio::test]
    async fn test_verify_otp_is_single_use() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;

        h.service.verify_otp("a@example.com", "123456").await.unwrap();

        let result = h.service.verify_otp("a@example.com", "123456").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_verify_otp_attempt_exhaustion() {
        let h = harness_with(OtpSettings {
            max_attempts: 2,
            ..OtpSettings::default()
        });

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;

        assert!(h.service.verify_otp("a@example.com", "000001").await.is_err());
        assert!(h.service.verify_otp("a@example.com", "000002").await.is_err());

        // Challenge is burned even with the right code now
        let result = h.service.verify_otp("a@example.com", "123456").await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_verify_otp_rate_limited() {
        let h = harness_with(OtpSettings {
            rate_limit: RateLimitConfig::new(2, 300),
            ..OtpSettings::default()
        });

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;

        assert!(h.service.verify_otp("a@example.com", "000001").await.is_err());
        assert!(h.service.verify_otp("a@example.com", "000002").await.is_err());

        let result = h.service.verify_otp("a@example.com", "123456").await;
        assert!(matches!(result, Err(DomainError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_otp_issue_rate_limited() {
        let h = harness_with(OtpSettings {
            rate_limit: RateLimitConfig::new(2, 300),
            ..OtpSettings::default()
        });

        // Signup consumes the first issue slot
        h.service.signup(signup_request("a@example.com")).await.unwrap();
        h.service.resend_signup_otp("a@example.com").await.unwrap();

        let result = h.service.resend_signup_otp("a@example.com").await;
        assert!(matches!(result, Err(DomainError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_login_happy_path() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;
        h.service.verify_otp("a@example.com", "123456").await.unwrap();

        let user = h
            .service
            .login("a@example.com", "secure_password123")
            .await
            .unwrap();

        assert!(user.is_some());
        assert!(user.unwrap().last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_login_unverified_account() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();

        let user = h
            .service
            .login("a@example.com", "secure_password123")
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;
        h.service.verify_otp("a@example.com", "123456").await.unwrap();

        let user = h.service.login("a@example.com", "wrong_password").await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let h = harness();

        let user = h.service.login("nobody@example.com", "whatever1").await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;
        h.service.verify_otp("a@example.com", "123456").await.unwrap();

        h.service.request_password_reset("a@example.com").await.unwrap();
        plant_code(&h, "a@example.com", "777777", OtpPurpose::PasswordReset).await;

        h.service
            .confirm_password_reset("a@example.com", "777777", "brand_new_password1")
            .await
            .unwrap();

        // Old password no longer works
        assert!(h
            .service
            .login("a@example.com", "secure_password123")
            .await
            .unwrap()
            .is_none());

        // New one does
        assert!(h
            .service
            .login("a@example.com", "brand_new_password1")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_password_reset_unknown_email_is_silent() {
        let h = harness();

        h.service
            .request_password_reset("nobody@example.com")
            .await
            .unwrap();

        assert!(h
            .challenges
            .get("nobody@example.com", OtpPurpose::PasswordReset)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_resend_after_verification_is_conflict() {
        let h = harness();

        h.service.signup(signup_request("a@example.com")).await.unwrap();
        plant_code(&h, "a@example.com", "123456", OtpPurpose::Signup).await;
        h.service.verify_otp("a@example.com", "123456").await.unwrap();

        let result = h.service.resend_signup_otp("a@example.com").await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }
}
