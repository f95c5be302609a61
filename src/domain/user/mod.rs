//! User domain - accounts, roles, and validation

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{User, UserId, UserRole, UserStatus};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_user_id, validate_username, UserValidationError,
};
