//! Authentication API endpoints
//!
//! Signup with OTP verification, login, logout, current-user info, and
//! OTP-based password resets.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json};
use crate::infrastructure::auth::SignupRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
        .route("/reset-password/request", post(request_password_reset))
        .route("/reset-password/confirm", post(confirm_password_reset))
}

/// Signup request body
#[derive(Debug, Deserialize, Validate)]
pub struct SignupApiRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// OTP verification request body
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

/// OTP re-delivery request body
#[derive(Debug, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(email)]
    pub email: String,
}

/// Login request body
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Password reset request body
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Password reset confirmation body
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmResetRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub status: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl UserResponse {
    fn from_user(user: &crate::domain::user::User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            email: user.email().to_string(),
            username: user.username().to_string(),
            role: user.role().to_string(),
            status: user.status().to_string(),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserResponse,
    pub message: String,
}

/// Login/verification response carrying a fresh token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

/// Simple message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a new account
///
/// POST /api/auth/signup
///
/// Creates a pending-verification account and emails an OTP code.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupApiRequest>,
) -> Result<Envelope<SignupResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let user = state
        .auth_service
        .signup(SignupRequest {
            email: request.email,
            username: request.username,
            password: request.password,
        })
        .await?;

    Ok(Envelope::created(SignupResponse {
        user: UserResponse::from_user(&user),
        message: "Verification code sent. Check your inbox.".to_string(),
    }))
}

/// Verify a signup OTP
///
/// POST /api/auth/verify-otp
///
/// Activates the account and returns a JWT.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Envelope<TokenResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let user = state
        .auth_service
        .verify_otp(&request.email, &request.code)
        .await?;

    Ok(Envelope::ok(token_response(&state, &user)?))
}

/// Re-send the signup OTP
///
/// POST /api/auth/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<Envelope<MessageResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    state.auth_service.resend_signup_otp(&request.email).await?;

    Ok(Envelope::ok(MessageResponse {
        message: "Verification code sent. Check your inbox.".to_string(),
    }))
}

/// Login with email and password
///
/// POST /api/auth/login
///
/// Returns a JWT token on successful authentication.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Envelope<TokenResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let user = state
        .auth_service
        .login(&request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    Ok(Envelope::ok(token_response(&state, &user)?))
}

/// Logout (client-side only for stateless JWT)
///
/// POST /api/auth/logout
///
/// For JWT tokens, logout is handled client-side by discarding the token.
/// This endpoint exists for API consistency.
pub async fn logout(_user: RequireUser) -> Result<Envelope<MessageResponse>, ApiError> {
    Ok(Envelope::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Get current authenticated user
///
/// GET /api/auth/me
pub async fn get_current_user(
    RequireUser(user): RequireUser,
) -> Result<Envelope<UserResponse>, ApiError> {
    Ok(Envelope::ok(UserResponse::from_user(&user)))
}

/// Start a password reset
///
/// POST /api/auth/reset-password/request
///
/// Always responds with success so account existence is not revealed.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Envelope<MessageResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    state
        .auth_service
        .request_password_reset(&request.email)
        .await?;

    Ok(Envelope::ok(MessageResponse {
        message: "If the email is registered, a reset code has been sent.".to_string(),
    }))
}

/// Complete a password reset
///
/// POST /api/auth/reset-password/confirm
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(request): Json<ConfirmResetRequest>,
) -> Result<Envelope<MessageResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    state
        .auth_service
        .confirm_password_reset(&request.email, &request.code, &request.new_password)
        .await?;

    Ok(Envelope::ok(MessageResponse {
        message: "Password updated. You can log in now.".to_string(),
    }))
}

fn token_response(
    state: &AppState,
    user: &crate::domain::user::User,
) -> Result<TokenResponse, ApiError> {
    let token = state
        .jwt_service
        .generate(user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(TokenResponse {
        token,
        user: UserResponse::from_user(user),
        expires_at: expires_at.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupApiRequest {
            email: "a@example.com".to_string(),
            username: "learner".to_string(),
            password: "secure_password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = SignupApiRequest {
            email: "not-an-email".to_string(),
            username: "learner".to_string(),
            password: "secure_password123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupApiRequest {
            email: "a@example.com".to_string(),
            username: "learner".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_verify_request_requires_six_digit_code() {
        let bad_code = VerifyOtpRequest {
            email: "a@example.com".to_string(),
            code: "123".to_string(),
        };
        assert!(bad_code.validate().is_err());

        let ok = VerifyOtpRequest {
            email: "a@example.com".to_string(),
            code: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
