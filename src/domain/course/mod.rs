//! Course domain - authoring and the approval state machine

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{Course, CourseId, CourseStatus};
pub use repository::{CoursePage, CourseRepository};
pub use validation::{
    validate_category, validate_description, validate_title, validate_token_reward,
    CourseValidationError,
};
