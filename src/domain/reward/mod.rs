//! Reward domain - token ledger

pub mod entity;
pub mod repository;

pub use entity::{EntryKind, RewardEntry};
pub use repository::RewardRepository;
