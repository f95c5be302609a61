//! Creator infrastructure - application storage

pub mod repository;

pub use repository::{InMemoryCreatorRepository, PostgresCreatorRepository};
