//! Job infrastructure - queue storage and enqueueing

pub mod queue;
pub mod repository;

pub use queue::JobQueue;
pub use repository::{InMemoryJobRepository, PostgresJobRepository};
