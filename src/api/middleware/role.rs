//! Role-gating extractors layered on JWT authentication

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

use super::user_auth::RequireUser;

/// Extractor that requires an authenticated user with the creator or admin
/// role
#[derive(Debug, Clone)]
pub struct RequireCreator(pub User);

impl FromRequestParts<AppState> for RequireCreator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.role().can_author_courses() {
            return Err(ApiError::forbidden("Creator access required"));
        }

        debug!(user_id = %user.id(), "Creator access granted");
        Ok(RequireCreator(user))
    }
}

/// Extractor that requires an authenticated admin
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.role().is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }

        debug!(user_id = %user.id(), "Admin access granted");
        Ok(RequireAdmin(user))
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::user::{User, UserId, UserRole};

    fn user_with_role(role: UserRole) -> User {
        let mut user = User::new(UserId::generate(), "a@example.com", "someone", "hash");
        user.set_role(role);
        user
    }

    #[test]
    fn test_role_gates() {
        assert!(!user_with_role(UserRole::Learner).role().can_author_courses());
        assert!(user_with_role(UserRole::Creator).role().can_author_courses());
        assert!(user_with_role(UserRole::Admin).role().can_author_courses());

        assert!(!user_with_role(UserRole::Creator).role().is_admin());
        assert!(user_with_role(UserRole::Admin).role().is_admin());
    }
}
