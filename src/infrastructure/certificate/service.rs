//! Certificate issuance and verification service

use std::sync::Arc;

use tracing::info;

use crate::domain::certificate::{Certificate, CertificateRepository};
use crate::domain::course::{CourseId, CourseRepository};
use crate::domain::reward::RewardRepository;
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::reward::RewardService;

use super::number::CertificateNumberGenerator;

/// Public verification result for a certificate number
#[derive(Debug, Clone)]
pub struct VerifiedCertificate {
    pub certificate: Certificate,
    /// Username of the holder at verification time
    pub holder: String,
}

/// Certificate service.
///
/// Issuance is the completion path: it checks the course is published,
/// enforces one certificate per (user, course), and credits the course's
/// token reward in the same call.
#[derive(Debug)]
pub struct CertificateService<C, K, U, R>
where
    C: CertificateRepository,
    K: CourseRepository,
    U: UserRepository,
    R: RewardRepository,
{
    certificates: Arc<C>,
    courses: Arc<K>,
    users: Arc<U>,
    rewards: Arc<RewardService<R>>,
    numbers: CertificateNumberGenerator,
}

impl<C, K, U, R> CertificateService<C, K, U, R>
where
    C: CertificateRepository,
    K: CourseRepository,
    U: UserRepository,
    R: RewardRepository,
{
    /// Create a new certificate service
    pub fn new(
        certificates: Arc<C>,
        courses: Arc<K>,
        users: Arc<U>,
        rewards: Arc<RewardService<R>>,
    ) -> Self {
        Self {
            certificates,
            courses,
            users,
            rewards,
            numbers: CertificateNumberGenerator::default(),
        }
    }

    /// Issue a certificate for a completed course and credit its reward
    pub async fn issue(
        &self,
        user_id: &UserId,
        course_id: &str,
    ) -> Result<Certificate, DomainError> {
        let course_id = CourseId::new(course_id);

        let course = self
            .courses
            .get(&course_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Course '{}' not found", course_id)))?;

        if !course.is_published() {
            return Err(DomainError::conflict(format!(
                "Course '{}' is not published",
                course_id
            )));
        }

        if self
            .certificates
            .get_for_user_course(user_id, &course_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "Certificate already issued for this course",
            ));
        }

        let certificate = Certificate::new(
            self.numbers.generate(),
            user_id.clone(),
            course_id.clone(),
            course.title(),
        );

        let certificate = self.certificates.create(certificate).await?;

        if course.token_reward() > 0 {
            self.rewards
                .credit(
                    user_id,
                    course.token_reward(),
                    "course completion",
                    Some(certificate.id().to_string()),
                )
                .await?;
        }

        info!(
            certificate_number = %certificate.certificate_number(),
            user_id = %user_id,
            course_id = %course_id,
            "Certificate issued"
        );

        Ok(certificate)
    }

    /// List a user's certificates
    pub async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Certificate>, DomainError> {
        self.certificates.list_for_user(user_id).await
    }

    /// Get one of the user's own certificates
    pub async fn get_for_user(
        &self,
        user_id: &UserId,
        id: &str,
    ) -> Result<Certificate, DomainError> {
        let certificate = self
            .certificates
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Certificate '{}' not found", id)))?;

        if certificate.user_id() != user_id {
            return Err(DomainError::forbidden(
                "Certificate belongs to a different user",
            ));
        }

        Ok(certificate)
    }

    /// Publicly verify a certificate number
    pub async fn verify(&self, number: &str) -> Result<VerifiedCertificate, DomainError> {
        let certificate = self
            .certificates
            .get_by_number(number)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("No certificate with number '{}'", number))
            })?;

        let holder = self
            .users
            .get(certificate.user_id())
            .await?
            .map(|u| u.username().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(VerifiedCertificate {
            certificate,
            holder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::Course;
    use crate::domain::user::User;
    use crate::infrastructure::certificate::repository::InMemoryCertificateRepository;
    use crate::infrastructure::course::InMemoryCourseRepository;
    use crate::infrastructure::reward::InMemoryRewardRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    type TestService = CertificateService<
        InMemoryCertificateRepository,
        InMemoryCourseRepository,
        InMemoryUserRepository,
        InMemoryRewardRepository,
    >;

    struct Harness {
        service: TestService,
        courses: Arc<InMemoryCourseRepository>,
        users: Arc<InMemoryUserRepository>,
        rewards: Arc<RewardService<InMemoryRewardRepository>>,
    }

    fn harness() -> Harness {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let rewards = Arc::new(RewardService::new(Arc::new(
            InMemoryRewardRepository::new(),
        )));

        let service = CertificateService::new(
            Arc::new(InMemoryCertificateRepository::new()),
            courses.clone(),
            users.clone(),
            rewards.clone(),
        );

        Harness {
            service,
            courses,
            users,
            rewards,
        }
    }

    async fn seed_user(h: &Harness) -> User {
        let mut user = User::new(UserId::generate(), "learner@example.com", "learner", "hash");
        user.verify();
        h.users.create(user.clone()).await.unwrap();
        user
    }

    async fn seed_published_course(h: &Harness, reward: i64) -> Course {
        let mut course = Course::new(
            CourseId::generate(),
            "Intro to Rust",
            "description",
            "programming",
            UserId::generate(),
            reward,
        );
        course.submit().unwrap();
        course.publish(UserId::generate()).unwrap();
        h.courses.create(course.clone()).await.unwrap();
        course
    }

    #[tokio::test]
    async fn test_issue_creates_certificate_and_credits_reward() {
        let h = harness();
        let user = seed_user(&h).await;
        let course = seed_published_course(&h, 50).await;

        let cert = h
            .service
            .issue(user.id(), course.id().as_str())
            .await
            .unwrap();

        assert!(cert.certificate_number().starts_with("TPC-"));
        assert_eq!(cert.course_title(), "Intro to Rust");

        let ledger = h.rewards.ledger(user.id()).await.unwrap();
        assert_eq!(ledger.balance, 50);
        assert_eq!(ledger.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_issue_twice_is_conflict() {
        let h = harness();
        let user = seed_user(&h).await;
        let course = seed_published_course(&h, 50).await;

        h.service.issue(user.id(), course.id().as_str()).await.unwrap();

        let result = h.service.issue(user.id(), course.id().as_str()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // No double reward
        let ledger = h.rewards.ledger(user.id()).await.unwrap();
        assert_eq!(ledger.balance, 50);
    }

    #[tokio::test]
    async fn test_issue_for_unpublished_course_is_conflict() {
        let h = harness();
        let user = seed_user(&h).await;

        let draft = Course::new(
            CourseId::generate(),
            "Draft",
            "description",
            "programming",
            UserId::generate(),
            50,
        );
        h.courses.create(draft.clone()).await.unwrap();

        let result = h.service.issue(user.id(), draft.id().as_str()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_issue_for_unknown_course_is_not_found() {
        let h = harness();
        let user = seed_user(&h).await;

        let result = h.service.issue(user.id(), "no-such-course").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_zero_reward_course_credits_nothing() {
        let h = harness();
        let user = seed_user(&h).await;
        let course = seed_published_course(&h, 0).await;

        h.service.issue(user.id(), course.id().as_str()).await.unwrap();

        let ledger = h.rewards.ledger(user.id()).await.unwrap();
        assert!(ledger.entries.is_empty());
    }

    #[tokio::test]
    async fn test_verify_known_number() {
        let h = harness();
        let user = seed_user(&h).await;
        let course = seed_published_course(&h, 50).await;

        let cert = h
            .service
            .issue(user.id(), course.id().as_str())
            .await
            .unwrap();

        let verified = h
            .service
            .verify(cert.certificate_number())
            .await
            .unwrap();

        assert_eq!(verified.certificate.id(), cert.id());
        assert_eq!(verified.holder, "learner");
    }

    #[tokio::test]
    async fn test_verify_unknown_number_is_not_found() {
        let h = harness();

        let result = h.service.verify("TPC-DOESNOTEXIST").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_for_user_enforces_ownership() {
        let h = harness();
        let user = seed_user(&h).await;
        let course = seed_published_course(&h, 50).await;

        let cert = h
            .service
            .issue(user.id(), course.id().as_str())
            .await
            .unwrap();

        let owned = h.service.get_for_user(user.id(), cert.id()).await.unwrap();
        assert_eq!(owned.id(), cert.id());

        let stranger = UserId::generate();
        let result = h.service.get_for_user(&stranger, cert.id()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }
}
