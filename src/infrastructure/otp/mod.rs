//! OTP infrastructure - code generation and challenge storage

pub mod generator;
pub mod repository;

pub use generator::{GeneratedOtp, OtpGenerator};
pub use repository::{InMemoryOtpRepository, PostgresOtpRepository};
