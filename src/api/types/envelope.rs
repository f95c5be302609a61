//! Success half of the response envelope
//!
//! All success responses render as `{"success": true, "data": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope wrapping a payload with its HTTP status
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    status: StatusCode,
    data: T,
}

#[derive(Debug, Serialize)]
struct EnvelopeBody<T> {
    success: bool,
    data: T,
}

impl<T> Envelope<T> {
    /// 200 OK envelope
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    /// 201 Created envelope
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }

    /// Access the wrapped payload
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The HTTP status this envelope renders with
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(EnvelopeBody {
                success: true,
                data: self.data,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_status() {
        let envelope = Envelope::ok("payload");
        assert_eq!(envelope.status(), StatusCode::OK);
    }

    #[test]
    fn test_created_envelope_status() {
        let envelope = Envelope::created("payload");
        assert_eq!(envelope.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_body_shape() {
        let body = EnvelopeBody {
            success: true,
            data: serde_json::json!({"id": "abc"}),
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":{\"id\":\"abc\"}"));
    }

    #[test]
    fn test_into_response_status() {
        let response = Envelope::created(serde_json::json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
