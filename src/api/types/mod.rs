//! Shared API types - envelope, errors, extractors

pub mod envelope;
pub mod error;
pub mod json;
pub mod pagination;

pub use envelope::Envelope;
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use pagination::{PageInfo, Pagination};
