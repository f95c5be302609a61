//! Domain layer - Core business logic and entities

pub mod certificate;
pub mod course;
pub mod creator;
pub mod error;
pub mod job;
pub mod otp;
pub mod reward;
pub mod user;

pub use certificate::{Certificate, CertificateRepository};
pub use course::{
    Course, CourseId, CoursePage, CourseRepository, CourseStatus, CourseValidationError,
};
pub use creator::{ApprovalStatus, CreatorProfile, CreatorRepository};
pub use error::DomainError;
pub use job::{GenerationJob, JobKind, JobRepository, JobStatus};
pub use otp::{OtpChallenge, OtpPurpose, OtpRepository};
pub use reward::{EntryKind, RewardEntry, RewardRepository};
pub use user::{User, UserId, UserRepository, UserRole, UserStatus, UserValidationError};
