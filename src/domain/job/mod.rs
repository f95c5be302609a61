//! Job domain - downstream generation work records

pub mod entity;
pub mod repository;

pub use entity::{GenerationJob, JobKind, JobStatus};
pub use repository::JobRepository;
