//! Email delivery for OTP codes
//!
//! SMTP delivery via lettre, with a log-only fallback for environments
//! without a configured mail server.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::fmt::Debug;
use tracing::{info, warn};

use crate::domain::otp::OtpPurpose;
use crate::domain::DomainError;

/// SMTP configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// From address, e.g. `Techpadie <no-reply@techpadie.com>`
    pub from_address: String,
}

impl EmailConfig {
    /// Build the configuration from environment variables.
    /// Returns `None` when SMTP is not configured.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let smtp_username = std::env::var("SMTP_USERNAME").ok()?;
        let smtp_password = std::env::var("SMTP_PASSWORD").ok()?;

        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_username,
            smtp_password,
            from_address: std::env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "Techpadie <no-reply@techpadie.com>".to_string()),
        })
    }
}

/// Trait for delivering OTP codes to users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpMailer: Send + Sync {
    /// Send an OTP code to the given address
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError>;
}

/// SMTP-backed mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl SmtpMailer {
    /// Create a mailer from SMTP configuration
    pub fn new(config: &EmailConfig) -> Result<Self, DomainError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| DomainError::mail(format!("Invalid SMTP relay: {}", e)))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

fn subject_for(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::Signup => "Verify your Techpadie account",
        OtpPurpose::PasswordReset => "Reset your Techpadie password",
    }
}

fn body_for(code: &str, purpose: OtpPurpose) -> String {
    match purpose {
        OtpPurpose::Signup => format!(
            "Welcome to Techpadie!\n\nYour verification code is: {}\n\n\
             The code expires shortly. If you did not sign up, ignore this email.\n",
            code
        ),
        OtpPurpose::PasswordReset => format!(
            "A password reset was requested for your Techpadie account.\n\n\
             Your reset code is: {}\n\n\
             If you did not request this, you can safely ignore this email.\n",
            code
        ),
    }
}

#[async_trait]
impl OtpMailer for SmtpMailer {
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| DomainError::mail(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| DomainError::mail(format!("Invalid recipient address: {}", e)))?)
            .subject(subject_for(purpose))
            .header(ContentType::TEXT_PLAIN)
            .body(body_for(code, purpose))
            .map_err(|e| DomainError::mail(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::mail(format!("Failed to send email: {}", e)))?;

        info!(to = %to, purpose = %purpose, "OTP email sent");
        Ok(())
    }
}

/// Mailer that only logs. Used when SMTP is not configured so local
/// development still surfaces the codes.
#[derive(Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OtpMailer for LogMailer {
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), DomainError> {
        warn!(
            to = %to,
            purpose = %purpose,
            code = %code,
            "SMTP not configured; OTP code logged instead of emailed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_per_purpose() {
        assert!(subject_for(OtpPurpose::Signup).contains("Verify"));
        assert!(subject_for(OtpPurpose::PasswordReset).contains("Reset"));
    }

    #[test]
    fn test_body_contains_code() {
        let body = body_for("123456", OtpPurpose::Signup);
        assert!(body.contains("123456"));

        let body = body_for("654321", OtpPurpose::PasswordReset);
        assert!(body.contains("654321"));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let mailer = LogMailer::new();

        mailer
            .send_otp("a@example.com", "123456", OtpPurpose::Signup)
            .await
            .unwrap();
    }
}
