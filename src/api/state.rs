//! Application state for shared services

use std::sync::Arc;

use crate::domain::course::{Course, CoursePage, CourseRepository, CourseStatus};
use crate::domain::creator::{ApprovalStatus, CreatorProfile, CreatorRepository};
use crate::domain::job::{GenerationJob, JobRepository, JobStatus};
use crate::domain::otp::OtpRepository;
use crate::domain::reward::RewardRepository;
use crate::domain::user::{User, UserId, UserRepository, UserStatus};
use crate::domain::{Certificate, CertificateRepository, DomainError};
use crate::infrastructure::admin::AdminService;
use crate::infrastructure::auth::{AuthService, JwtGenerator, SignupRequest};
use crate::infrastructure::certificate::{CertificateService, VerifiedCertificate};
use crate::infrastructure::course::{CourseService, CreateCourseRequest, UpdateCourseRequest};
use crate::infrastructure::reward::{Ledger, RewardService};
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub course_service: Arc<dyn CourseServiceTrait>,
    pub admin_service: Arc<dyn AdminServiceTrait>,
    pub certificate_service: Arc<dyn CertificateServiceTrait>,
    pub reward_service: Arc<dyn RewardServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthServiceTrait>,
        user_service: Arc<dyn UserServiceTrait>,
        course_service: Arc<dyn CourseServiceTrait>,
        admin_service: Arc<dyn AdminServiceTrait>,
        certificate_service: Arc<dyn CertificateServiceTrait>,
        reward_service: Arc<dyn RewardServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            course_service,
            admin_service,
            certificate_service,
            reward_service,
            jwt_service,
        }
    }
}

/// Trait for authentication operations
#[async_trait::async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn signup(&self, request: SignupRequest) -> Result<User, DomainError>;
    async fn resend_signup_otp(&self, email: &str) -> Result<(), DomainError>;
    async fn verify_otp(&self, email: &str, code: &str) -> Result<User, DomainError>;
    async fn login(&self, email: &str, password: &str) -> Result<Option<User>, DomainError>;
    async fn request_password_reset(&self, email: &str) -> Result<(), DomainError>;
    async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), DomainError>;
}

/// Trait for user management operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>, DomainError>;
    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError>;
    async fn suspend(&self, id: &str) -> Result<User, DomainError>;
    async fn activate(&self, id: &str) -> Result<User, DomainError>;
}

/// Trait for course authoring and catalog operations
#[async_trait::async_trait]
pub trait CourseServiceTrait: Send + Sync {
    async fn create(
        &self,
        creator_id: &UserId,
        request: CreateCourseRequest,
    ) -> Result<Course, DomainError>;
    async fn update(
        &self,
        creator_id: &UserId,
        id: &str,
        request: UpdateCourseRequest,
    ) -> Result<Course, DomainError>;
    async fn submit(&self, creator_id: &UserId, id: &str) -> Result<Course, DomainError>;
    async fn list_mine(&self, creator_id: &UserId) -> Result<Vec<Course>, DomainError>;
    async fn get_published(&self, id: &str) -> Result<Course, DomainError>;
    async fn list_published(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<CoursePage, DomainError>;
}

/// Trait for admin approval workflows
#[async_trait::async_trait]
pub trait AdminServiceTrait: Send + Sync {
    async fn list_courses(
        &self,
        status: Option<CourseStatus>,
    ) -> Result<Vec<Course>, DomainError>;
    async fn approve_course(
        &self,
        admin_id: &UserId,
        course_id: &str,
    ) -> Result<(Course, Vec<GenerationJob>), DomainError>;
    async fn reject_course(
        &self,
        admin_id: &UserId,
        course_id: &str,
        reason: &str,
    ) -> Result<Course, DomainError>;
    async fn apply_for_creator(
        &self,
        user_id: &UserId,
        display_name: &str,
        bio: Option<String>,
    ) -> Result<CreatorProfile, DomainError>;
    async fn my_application(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorProfile>, DomainError>;
    async fn list_applications(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<CreatorProfile>, DomainError>;
    async fn approve_creator(
        &self,
        admin_id: &UserId,
        profile_id: &str,
    ) -> Result<CreatorProfile, DomainError>;
    async fn reject_creator(
        &self,
        admin_id: &UserId,
        profile_id: &str,
    ) -> Result<CreatorProfile, DomainError>;
    async fn list_jobs(
        &self,
        status: Option<JobStatus>,
    ) -> Result<Vec<GenerationJob>, DomainError>;
}

/// Trait for certificate operations
#[async_trait::async_trait]
pub trait CertificateServiceTrait: Send + Sync {
    async fn issue(&self, user_id: &UserId, course_id: &str)
        -> Result<Certificate, DomainError>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Certificate>, DomainError>;
    async fn get_for_user(
        &self,
        user_id: &UserId,
        id: &str,
    ) -> Result<Certificate, DomainError>;
    async fn verify(&self, number: &str) -> Result<VerifiedCertificate, DomainError>;
}

/// Trait for reward ledger operations
#[async_trait::async_trait]
pub trait RewardServiceTrait: Send + Sync {
    async fn ledger(&self, user_id: &UserId) -> Result<Ledger, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, O, H> AuthServiceTrait for AuthService<R, O, H>
where
    R: UserRepository + 'static,
    O: OtpRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        AuthService::signup(self, request).await
    }

    async fn resend_signup_otp(&self, email: &str) -> Result<(), DomainError> {
        AuthService::resend_signup_otp(self, email).await
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<User, DomainError> {
        AuthService::verify_otp(self, email, code).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Option<User>, DomainError> {
        AuthService::login(self, email, password).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        AuthService::request_password_reset(self, email).await
    }

    async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        AuthService::confirm_password_reset(self, email, code, new_password).await
    }
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>, DomainError> {
        UserService::list(self, status).await
    }

    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        UserService::count(self, status).await
    }

    async fn suspend(&self, id: &str) -> Result<User, DomainError> {
        UserService::suspend(self, id).await
    }

    async fn activate(&self, id: &str) -> Result<User, DomainError> {
        UserService::activate(self, id).await
    }
}

#[async_trait::async_trait]
impl<R: CourseRepository + 'static> CourseServiceTrait for CourseService<R> {
    async fn create(
        &self,
        creator_id: &UserId,
        request: CreateCourseRequest,
    ) -> Result<Course, DomainError> {
        CourseService::create(self, creator_id, request).await
    }

    async fn update(
        &self,
        creator_id: &UserId,
        id: &str,
        request: UpdateCourseRequest,
    ) -> Result<Course, DomainError> {
        CourseService::update(self, creator_id, id, request).await
    }

    async fn submit(&self, creator_id: &UserId, id: &str) -> Result<Course, DomainError> {
        CourseService::submit(self, creator_id, id).await
    }

    async fn list_mine(&self, creator_id: &UserId) -> Result<Vec<Course>, DomainError> {
        CourseService::list_mine(self, creator_id).await
    }

    async fn get_published(&self, id: &str) -> Result<Course, DomainError> {
        CourseService::get_published(self, id).await
    }

    async fn list_published(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<CoursePage, DomainError> {
        CourseService::list_published(self, offset, limit).await
    }
}

#[async_trait::async_trait]
impl<K, P, U, J> AdminServiceTrait for AdminService<K, P, U, J>
where
    K: CourseRepository + 'static,
    P: CreatorRepository + 'static,
    U: UserRepository + 'static,
    J: JobRepository + 'static,
{
    async fn list_courses(
        &self,
        status: Option<CourseStatus>,
    ) -> Result<Vec<Course>, DomainError> {
        AdminService::list_courses(self, status).await
    }

    async fn approve_course(
        &self,
        admin_id: &UserId,
        course_id: &str,
    ) -> Result<(Course, Vec<GenerationJob>), DomainError> {
        AdminService::approve_course(self, admin_id, course_id).await
    }

    async fn reject_course(
        &self,
        admin_id: &UserId,
        course_id: &str,
        reason: &str,
    ) -> Result<Course, DomainError> {
        AdminService::reject_course(self, admin_id, course_id, reason).await
    }

    async fn apply_for_creator(
        &self,
        user_id: &UserId,
        display_name: &str,
        bio: Option<String>,
    ) -> Result<CreatorProfile, DomainError> {
        AdminService::apply_for_creator(self, user_id, display_name, bio).await
    }

    async fn my_application(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorProfile>, DomainError> {
        AdminService::my_application(self, user_id).await
    }

    async fn list_applications(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<CreatorProfile>, DomainError> {
        AdminService::list_applications(self, status).await
    }

    async fn approve_creator(
        &self,
        admin_id: &UserId,
        profile_id: &str,
    ) -> Result<CreatorProfile, DomainError> {
        AdminService::approve_creator(self, admin_id, profile_id).await
    }

    async fn reject_creator(
        &self,
        admin_id: &UserId,
        profile_id: &str,
    ) -> Result<CreatorProfile, DomainError> {
        AdminService::reject_creator(self, admin_id, profile_id).await
    }

    async fn list_jobs(
        &self,
        status: Option<JobStatus>,
    ) -> Result<Vec<GenerationJob>, DomainError> {
        AdminService::list_jobs(self, status).await
    }
}

#[async_trait::async_trait]
impl<C, K, U, R> CertificateServiceTrait for CertificateService<C, K, U, R>
where
    C: CertificateRepository + 'static,
    K: CourseRepository + 'static,
    U: UserRepository + 'static,
    R: RewardRepository + 'static,
{
    async fn issue(
        &self,
        user_id: &UserId,
        course_id: &str,
    ) -> Result<Certificate, DomainError> {
        CertificateService::issue(self, user_id, course_id).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Certificate>, DomainError> {
        CertificateService::list_for_user(self, user_id).await
    }

    async fn get_for_user(
        &self,
        user_id: &UserId,
        id: &str,
    ) -> Result<Certificate, DomainError> {
        CertificateService::get_for_user(self, user_id, id).await
    }

    async fn verify(&self, number: &str) -> Result<VerifiedCertificate, DomainError> {
        CertificateService::verify(self, number).await
    }
}

#[async_trait::async_trait]
impl<R: RewardRepository + 'static> RewardServiceTrait for RewardService<R> {
    async fn ledger(&self, user_id: &UserId) -> Result<Ledger, DomainError> {
        RewardService::ledger(self, user_id).await
    }
}
