//! In-memory user repository for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository, UserStatus};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let id = user.id().as_str().to_string();

        if users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        if users.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let id = user.id().as_str().to_string();

        if !users.contains_key(&id) {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        let email_taken = users
            .values()
            .any(|u| u.email() == user.email() && u.id().as_str() != id);

        if email_taken {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        users.insert(id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.remove(id.as_str()).is_some())
    }

    async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| status.map_or(true, |s| u.status() == s))
            .cloned()
            .collect();

        result.sort_by_key(|u| u.created_at());
        Ok(result)
    }

    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        let users = self.users.read().await;

        Ok(users
            .values()
            .filter(|u| status.map_or(true, |s| u.status() == s))
            .count())
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        if let Some(user) = users.get_mut(id.as_str()) {
            user.record_login();
            Ok(())
        } else {
            Err(DomainError::not_found(format!("User '{}' not found", id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(email: &str, username: &str) -> User {
        User::new(UserId::generate(), email, username, "hashed_password")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("a@example.com", "alice");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().email(), "a@example.com");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("a@example.com", "alice");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get_by_email("a@example.com").await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().id(), user.id());
    }

    #[tokio::test]
    async fn test_email_uniqueness() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("a@example.com", "alice"))
            .await
            .unwrap();

        let result = repo.create(create_test_user("a@example.com", "alice2")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update() {
        let repo = InMemoryUserRepository::new();
        let mut user = create_test_user("a@example.com", "alice");

        repo.create(user.clone()).await.unwrap();

        user.set_username("alicia");
        repo.update(&user).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.username(), "alicia");
    }

    #[tokio::test]
    async fn test_list_filtered_by_status() {
        let repo = InMemoryUserRepository::new();

        let mut active = create_test_user("a@example.com", "alice");
        active.verify();
        repo.create(active).await.unwrap();
        repo.create(create_test_user("b@example.com", "bob"))
            .await
            .unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let pending = repo
            .list(Some(UserStatus::PendingVerification))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].email(), "b@example.com");
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("a@example.com", "alice");

        repo.create(user.clone()).await.unwrap();
        repo.record_login(user.id()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert!(retrieved.last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("a@example.com", "alice");

        repo.create(user.clone()).await.unwrap();

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(repo.get(user.id()).await.unwrap().is_none());
    }
}
