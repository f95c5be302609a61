//! Auth infrastructure - JWT, throttling, and credential flows

pub mod jwt;
pub mod rate_limiter;
pub mod service;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
pub use rate_limiter::{RateLimitConfig, RateLimitResult, RateLimiter};
pub use service::{AuthService, OtpSettings, SignupRequest};
