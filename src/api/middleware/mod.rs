//! API middleware components

pub mod logging;
pub mod role;
pub mod security;
pub mod user_auth;

pub use logging::{logging_middleware, redact_json_sensitive_fields};
pub use role::{RequireAdmin, RequireCreator};
pub use security::security_headers_middleware;
pub use user_auth::RequireUser;
