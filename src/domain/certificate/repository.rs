//! Certificate repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Certificate;
use crate::domain::course::CourseId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for certificate storage
#[async_trait]
pub trait CertificateRepository: Send + Sync + Debug {
    /// Get a certificate by its internal ID
    async fn get(&self, id: &str) -> Result<Option<Certificate>, DomainError>;

    /// Get a certificate by its public number (verification)
    async fn get_by_number(&self, number: &str) -> Result<Option<Certificate>, DomainError>;

    /// Get the certificate a user holds for a course, if any
    async fn get_for_user_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Certificate>, DomainError>;

    /// Store a newly issued certificate
    async fn create(&self, certificate: Certificate) -> Result<Certificate, DomainError>;

    /// List a user's certificates, newest first
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Certificate>, DomainError>;
}
