//! Course infrastructure - storage and authoring service

pub mod repository;
pub mod service;

pub use repository::{InMemoryCourseRepository, PostgresCourseRepository};
pub use service::{CourseService, CreateCourseRequest, UpdateCourseRequest};
