//! Certificate endpoints - listing, detail, public verification

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope};
use crate::domain::certificate::Certificate;

/// Create the certificate router
pub fn create_certificate_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_certificates))
        .route("/verify", get(verify_certificate))
        .route("/{id}", get(get_certificate))
}

/// Certificate response
#[derive(Debug, Serialize)]
pub struct CertificateResponse {
    pub id: String,
    pub certificate_number: String,
    pub course_id: String,
    pub course_title: String,
    pub issued_at: String,
}

impl From<&Certificate> for CertificateResponse {
    fn from(certificate: &Certificate) -> Self {
        Self {
            id: certificate.id().to_string(),
            certificate_number: certificate.certificate_number().to_string(),
            course_id: certificate.course_id().as_str().to_string(),
            course_title: certificate.course_title().to_string(),
            issued_at: certificate.issued_at().to_rfc3339(),
        }
    }
}

/// List certificates response
#[derive(Debug, Serialize)]
pub struct CertificateListResponse {
    pub certificates: Vec<CertificateResponse>,
    pub total: usize,
}

/// Verification query parameters (`?id=TPC-...`)
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// The public certificate number
    pub id: String,
}

/// Public verification response
#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub valid: bool,
    pub certificate_number: String,
    pub course_title: String,
    pub holder: String,
    pub issued_at: String,
}

/// GET /api/certificates
///
/// The authenticated user's certificates.
pub async fn list_certificates(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Envelope<CertificateListResponse>, ApiError> {
    let certificates = state.certificate_service.list_for_user(user.id()).await?;

    let responses: Vec<CertificateResponse> =
        certificates.iter().map(CertificateResponse::from).collect();
    let total = responses.len();

    Ok(Envelope::ok(CertificateListResponse {
        certificates: responses,
        total,
    }))
}

/// GET /api/certificates/{id}
///
/// One of the authenticated user's certificates.
pub async fn get_certificate(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Envelope<CertificateResponse>, ApiError> {
    let certificate = state.certificate_service.get_for_user(user.id(), &id).await?;

    Ok(Envelope::ok(CertificateResponse::from(&certificate)))
}

/// GET /api/certificates/verify?id={number}
///
/// Public verification by certificate number. No authentication required.
pub async fn verify_certificate(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Envelope<VerificationResponse>, ApiError> {
    let verified = state.certificate_service.verify(&query.id).await?;

    Ok(Envelope::ok(VerificationResponse {
        valid: true,
        certificate_number: verified.certificate.certificate_number().to_string(),
        course_title: verified.certificate.course_title().to_string(),
        holder: verified.holder,
        issued_at: verified.certificate.issued_at().to_rfc3339(),
    }))
}
