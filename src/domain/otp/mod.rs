//! OTP domain - one-time password challenges

pub mod entity;
pub mod repository;

pub use entity::{OtpChallenge, OtpPurpose};
pub use repository::OtpRepository;
