//! Reward infrastructure - ledger storage and service

pub mod repository;
pub mod service;

pub use repository::{InMemoryRewardRepository, PostgresRewardRepository};
pub use service::{Ledger, RewardService};
