//! User management service

use std::sync::Arc;

use crate::domain::user::{User, UserId, UserRepository, UserRole, UserStatus};
use crate::domain::DomainError;

/// User lookup and administration service.
///
/// Signup and credential flows live in the auth service; this one covers
/// everything that happens to an account after it exists.
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(email).await
    }

    /// List users, optionally filtered by status
    pub async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>, DomainError> {
        self.repository.list(status).await
    }

    /// Count users, optionally filtered by status
    pub async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        self.repository.count(status).await
    }

    /// Suspend a user
    pub async fn suspend(&self, id: &str) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;
        user.suspend();
        self.repository.update(&user).await
    }

    /// Activate a suspended user
    pub async fn activate(&self, id: &str) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;
        user.activate();
        self.repository.update(&user).await
    }

    /// Promote a learner to the creator role
    pub async fn promote_to_creator(&self, id: &UserId) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if user.role() == UserRole::Admin {
            return Ok(user);
        }

        user.promote_to_creator();
        self.repository.update(&user).await
    }

    async fn require(&self, id: &str) -> Result<User, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.repository
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    async fn seed_user(service: &UserService<InMemoryUserRepository>, email: &str) -> User {
        let mut user = User::new(UserId::generate(), email, "someone", "hash");
        user.verify();
        service.repository.create(user.clone()).await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let service = create_service();
        seed_user(&service, "a@example.com").await;

        let found = service.get_by_email("a@example.com").await.unwrap();
        assert!(found.is_some());

        let missing = service.get_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_suspend_and_activate() {
        let service = create_service();
        let user = seed_user(&service, "a@example.com").await;

        let suspended = service.suspend(user.id().as_str()).await.unwrap();
        assert_eq!(suspended.status(), UserStatus::Suspended);

        let activated = service.activate(user.id().as_str()).await.unwrap();
        assert_eq!(activated.status(), UserStatus::Active);
    }

    #[tokio::test]
    async fn test_suspend_unknown_user() {
        let service = create_service();

        let result = service.suspend("no-such-user").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_promote_to_creator() {
        let service = create_service();
        let user = seed_user(&service, "a@example.com").await;

        let promoted = service.promote_to_creator(user.id()).await.unwrap();
        assert_eq!(promoted.role(), UserRole::Creator);
    }

    #[tokio::test]
    async fn test_promote_leaves_admin_alone() {
        let service = create_service();
        let mut user = User::new(UserId::generate(), "admin@example.com", "admin", "hash");
        user.set_role(UserRole::Admin);
        service.repository.create(user.clone()).await.unwrap();

        let result = service.promote_to_creator(user.id()).await.unwrap();
        assert_eq!(result.role(), UserRole::Admin);
    }

    #[tokio::test]
    async fn test_count() {
        let service = create_service();
        seed_user(&service, "a@example.com").await;
        seed_user(&service, "b@example.com").await;

        assert_eq!(service.count(None).await.unwrap(), 2);
        assert_eq!(
            service.count(Some(UserStatus::Active)).await.unwrap(),
            2
        );
    }
}
