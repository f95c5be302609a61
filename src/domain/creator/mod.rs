//! Creator domain - content author applications

pub mod entity;
pub mod repository;

pub use entity::{ApprovalStatus, CreatorProfile};
pub use repository::CreatorRepository;
