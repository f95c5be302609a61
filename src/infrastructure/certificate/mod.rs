//! Certificate infrastructure - numbers, storage, issuance

pub mod number;
pub mod repository;
pub mod service;

pub use number::CertificateNumberGenerator;
pub use repository::{InMemoryCertificateRepository, PostgresCertificateRepository};
pub use service::{CertificateService, VerifiedCertificate};
