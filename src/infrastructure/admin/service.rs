//! Admin service - approval workflows
//!
//! Covers the two moderation pipelines: course review (publish/reject plus
//! downstream job enqueueing) and creator applications (approve/reject plus
//! role promotion).

use std::sync::Arc;

use tracing::info;

use crate::domain::course::{Course, CourseId, CourseRepository, CourseStatus};
use crate::domain::creator::{ApprovalStatus, CreatorProfile, CreatorRepository};
use crate::domain::job::{GenerationJob, JobRepository, JobStatus};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::job::JobQueue;
use crate::infrastructure::user::UserService;

/// Admin approval workflows
#[derive(Debug)]
pub struct AdminService<K, P, U, J>
where
    K: CourseRepository,
    P: CreatorRepository,
    U: UserRepository,
    J: JobRepository,
{
    courses: Arc<K>,
    profiles: Arc<P>,
    users: Arc<UserService<U>>,
    jobs: Arc<JobQueue<J>>,
}

impl<K, P, U, J> AdminService<K, P, U, J>
where
    K: CourseRepository,
    P: CreatorRepository,
    U: UserRepository,
    J: JobRepository,
{
    /// Create a new admin service
    pub fn new(
        courses: Arc<K>,
        profiles: Arc<P>,
        users: Arc<UserService<U>>,
        jobs: Arc<JobQueue<J>>,
    ) -> Self {
        Self {
            courses,
            profiles,
            users,
            jobs,
        }
    }

    // Course review

    /// List courses for review, optionally filtered by status
    pub async fn list_courses(
        &self,
        status: Option<CourseStatus>,
    ) -> Result<Vec<Course>, DomainError> {
        self.courses.list(status).await
    }

    /// Approve a submitted course: publish it and enqueue generation jobs
    pub async fn approve_course(
        &self,
        admin_id: &UserId,
        course_id: &str,
    ) -> Result<(Course, Vec<GenerationJob>), DomainError> {
        let mut course = self.require_course(course_id).await?;

        course.publish(admin_id.clone())?;
        let course = self.courses.update(&course).await?;

        let jobs = self.jobs.enqueue_publication_jobs(course.id()).await?;

        info!(
            course_id = %course.id(),
            admin_id = %admin_id,
            jobs = jobs.len(),
            "Course approved and published"
        );

        Ok((course, jobs))
    }

    /// Reject a submitted course with a reason
    pub async fn reject_course(
        &self,
        admin_id: &UserId,
        course_id: &str,
        reason: &str,
    ) -> Result<Course, DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::validation("Rejection reason is required"));
        }

        let mut course = self.require_course(course_id).await?;

        course.reject(reason)?;
        let course = self.courses.update(&course).await?;

        info!(course_id = %course.id(), admin_id = %admin_id, "Course rejected");
        Ok(course)
    }

    // Creator applications

    /// Apply to become a creator. One application per user.
    pub async fn apply_for_creator(
        &self,
        user_id: &UserId,
        display_name: &str,
        bio: Option<String>,
    ) -> Result<CreatorProfile, DomainError> {
        if display_name.trim().is_empty() {
            return Err(DomainError::validation("Display name is required"));
        }

        if self.profiles.get_by_user(user_id).await?.is_some() {
            return Err(DomainError::conflict(
                "Creator application already exists for this user",
            ));
        }

        let profile = self
            .profiles
            .create(CreatorProfile::new(user_id.clone(), display_name, bio))
            .await?;

        info!(user_id = %user_id, "Creator application received");
        Ok(profile)
    }

    /// Get the caller's own application, if any
    pub async fn my_application(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorProfile>, DomainError> {
        self.profiles.get_by_user(user_id).await
    }

    /// List creator applications, optionally filtered by status
    pub async fn list_applications(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<CreatorProfile>, DomainError> {
        self.profiles.list(status).await
    }

    /// Approve a creator application and promote the user
    pub async fn approve_creator(
        &self,
        admin_id: &UserId,
        profile_id: &str,
    ) -> Result<CreatorProfile, DomainError> {
        let mut profile = self.require_profile(profile_id).await?;

        profile.approve(admin_id.clone())?;
        let profile = self.profiles.update(&profile).await?;

        self.users.promote_to_creator(profile.user_id()).await?;

        info!(
            profile_id = %profile.id(),
            user_id = %profile.user_id(),
            admin_id = %admin_id,
            "Creator application approved"
        );

        Ok(profile)
    }

    /// Reject a creator application
    pub async fn reject_creator(
        &self,
        admin_id: &UserId,
        profile_id: &str,
    ) -> Result<CreatorProfile, DomainError> {
        let mut profile = self.require_profile(profile_id).await?;

        profile.reject(admin_id.clone())?;
        let profile = self.profiles.update(&profile).await?;

        info!(profile_id = %profile.id(), admin_id = %admin_id, "Creator application rejected");
        Ok(profile)
    }

    // Jobs

    /// List generation jobs, optionally filtered by status
    pub async fn list_jobs(
        &self,
        status: Option<JobStatus>,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        self.jobs.list(status).await
    }

    async fn require_course(&self, id: &str) -> Result<Course, DomainError> {
        self.courses
            .get(&CourseId::new(id))
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Course '{}' not found", id)))
    }

    async fn require_profile(&self, id: &str) -> Result<CreatorProfile, DomainError> {
        self.profiles
            .get(id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Creator application '{}' not found", id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{User, UserRole};
    use crate::infrastructure::course::InMemoryCourseRepository;
    use crate::infrastructure::creator::InMemoryCreatorRepository;
    use crate::infrastructure::job::InMemoryJobRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    type TestService = AdminService<
        InMemoryCourseRepository,
        InMemoryCreatorRepository,
        InMemoryUserRepository,
        InMemoryJobRepository,
    >;

    struct Harness {
        service: TestService,
        courses: Arc<InMemoryCourseRepository>,
        users: Arc<InMemoryUserRepository>,
    }

    fn harness() -> Harness {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());

        let service = AdminService::new(
            courses.clone(),
            Arc::new(InMemoryCreatorRepository::new()),
            Arc::new(UserService::new(users.clone())),
            Arc::new(JobQueue::new(Arc::new(InMemoryJobRepository::new()))),
        );

        Harness {
            service,
            courses,
            users,
        }
    }

    async fn seed_submitted_course(h: &Harness) -> Course {
        let mut course = Course::new(
            CourseId::generate(),
            "Intro to Rust",
            "description",
            "programming",
            UserId::generate(),
            50,
        );
        course.submit().unwrap();
        h.courses.create(course.clone()).await.unwrap();
        course
    }

    async fn seed_learner(h: &Harness, email: &str) -> User {
        let mut user = User::new(UserId::generate(), email, "learner", "hash");
        user.verify();
        h.users.create(user.clone()).await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_approve_course_publishes_and_enqueues_jobs() {
        let h = harness();
        let course = seed_submitted_course(&h).await;
        let admin = UserId::generate();

        let (approved, jobs) = h
            .service
            .approve_course(&admin, course.id().as_str())
            .await
            .unwrap();

        assert_eq!(approved.status(), CourseStatus::Published);
        assert_eq!(approved.approved_by(), Some(&admin));
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.status() == JobStatus::Queued));
        assert!(jobs.iter().all(|j| j.course_id() == course.id()));
    }

    #[tokio::test]
    async fn test_approve_draft_course_is_conflict() {
        let h = harness();
        let draft = Course::new(
            CourseId::generate(),
            "Draft",
            "description",
            "programming",
            UserId::generate(),
            50,
        );
        h.courses.create(draft.clone()).await.unwrap();

        let result = h
            .service
            .approve_course(&UserId::generate(), draft.id().as_str())
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // No jobs were enqueued for the failed approval
        let jobs = h.service.list_jobs(None).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_approve_unknown_course_is_not_found() {
        let h = harness();

        let result = h
            .service
            .approve_course(&UserId::generate(), "no-such-course")
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_reject_course_requires_reason() {
        let h = harness();
        let course = seed_submitted_course(&h).await;

        let result = h
            .service
            .reject_course(&UserId::generate(), course.id().as_str(), "  ")
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_reject_course() {
        let h = harness();
        let course = seed_submitted_course(&h).await;

        let rejected = h
            .service
            .reject_course(&UserId::generate(), course.id().as_str(), "too shallow")
            .await
            .unwrap();

        assert_eq!(rejected.status(), CourseStatus::Rejected);
        assert_eq!(rejected.rejection_reason(), Some("too shallow"));
    }

    #[tokio::test]
    async fn test_creator_application_flow() {
        let h = harness();
        let user = seed_learner(&h, "author@example.com").await;
        let admin = UserId::generate();

        let profile = h
            .service
            .apply_for_creator(user.id(), "Ada", Some("Teaches math".to_string()))
            .await
            .unwrap();

        assert_eq!(profile.status(), ApprovalStatus::Pending);

        let approved = h
            .service
            .approve_creator(&admin, profile.id())
            .await
            .unwrap();

        assert!(approved.is_approved());

        // The user was promoted
        let user = h.users.get(user.id()).await.unwrap().unwrap();
        assert_eq!(user.role(), UserRole::Creator);
    }

    #[tokio::test]
    async fn test_duplicate_application_is_conflict() {
        let h = harness();
        let user = seed_learner(&h, "author@example.com").await;

        h.service
            .apply_for_creator(user.id(), "Ada", None)
            .await
            .unwrap();

        let result = h.service.apply_for_creator(user.id(), "Ada", None).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_reject_creator_does_not_promote() {
        let h = harness();
        let user = seed_learner(&h, "author@example.com").await;

        let profile = h
            .service
            .apply_for_creator(user.id(), "Ada", None)
            .await
            .unwrap();

        h.service
            .reject_creator(&UserId::generate(), profile.id())
            .await
            .unwrap();

        let user = h.users.get(user.id()).await.unwrap().unwrap();
        assert_eq!(user.role(), UserRole::Learner);
    }

    #[tokio::test]
    async fn test_double_review_is_conflict() {
        let h = harness();
        let user = seed_learner(&h, "author@example.com").await;
        let admin = UserId::generate();

        let profile = h
            .service
            .apply_for_creator(user.id(), "Ada", None)
            .await
            .unwrap();

        h.service.approve_creator(&admin, profile.id()).await.unwrap();

        let result = h.service.reject_creator(&admin, profile.id()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_list_applications_by_status() {
        let h = harness();
        let alice = seed_learner(&h, "alice@example.com").await;
        let bob = seed_learner(&h, "bob@example.com").await;
        let admin = UserId::generate();

        let p1 = h
            .service
            .apply_for_creator(alice.id(), "Alice", None)
            .await
            .unwrap();
        h.service
            .apply_for_creator(bob.id(), "Bob", None)
            .await
            .unwrap();

        h.service.approve_creator(&admin, p1.id()).await.unwrap();

        let pending = h
            .service
            .list_applications(Some(ApprovalStatus::Pending))
            .await
            .unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].display_name(), "Bob");
    }
}
