//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserId, UserRepository, UserRole, UserStatus};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, email, username, password_hash, role, status, \
                            created_at, updated_at, last_login_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, role, status,
                               created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(role_to_str(user.role()))
        .bind(status_to_str(user.status()))
        .bind(user.created_at())
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                if msg.contains("email") {
                    DomainError::conflict(format!(
                        "Email '{}' is already registered",
                        user.email()
                    ))
                } else {
                    DomainError::conflict(format!(
                        "User with ID '{}' already exists",
                        user.id().as_str()
                    ))
                }
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = $4, role = $5,
                status = $6, updated_at = $7, last_login_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(role_to_str(user.role()))
        .bind(status_to_str(user.status()))
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Email '{}' is already registered",
                    user.email()
                ))
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id().as_str()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM users WHERE status = $1 ORDER BY created_at",
                    USER_COLUMNS
                ))
                .bind(status_to_str(s))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM users ORDER BY created_at",
                    USER_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        let count: i64 = match status {
            Some(s) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = $1")
                    .bind(status_to_str(s))
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                id.as_str()
            )));
        }

        Ok(())
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: String = row.get("id");
    let email: String = row.get("email");
    let username: String = row.get("username");
    let password_hash: String = row.get("password_hash");
    let role: String = row.get("role");
    let status: String = row.get("status");

    let user_id = UserId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::new(user_id, email, username, password_hash).restore(
        str_to_role(&role),
        str_to_status(&status),
        row.get("created_at"),
        row.get("updated_at"),
        row.get("last_login_at"),
    ))
}

fn status_to_str(status: UserStatus) -> &'static str {
    match status {
        UserStatus::PendingVerification => "pending_verification",
        UserStatus::Active => "active",
        UserStatus::Suspended => "suspended",
    }
}

fn str_to_status(s: &str) -> UserStatus {
    match s {
        "active" => UserStatus::Active,
        "suspended" => UserStatus::Suspended,
        _ => UserStatus::PendingVerification,
    }
}

fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::Learner => "learner",
        UserRole::Creator => "creator",
        UserRole::Admin => "admin",
    }
}

fn str_to_role(s: &str) -> UserRole {
    match s {
        "creator" => UserRole::Creator,
        "admin" => UserRole::Admin,
        _ => UserRole::Learner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(status_to_str(UserStatus::Active), "active");
        assert_eq!(
            status_to_str(UserStatus::PendingVerification),
            "pending_verification"
        );
        assert_eq!(status_to_str(UserStatus::Suspended), "suspended");

        assert_eq!(str_to_status("active"), UserStatus::Active);
        assert_eq!(str_to_status("suspended"), UserStatus::Suspended);
        assert_eq!(
            str_to_status("pending_verification"),
            UserStatus::PendingVerification
        );
        assert_eq!(str_to_status("unknown"), UserStatus::PendingVerification);
    }

    #[test]
    fn test_role_conversion() {
        assert_eq!(role_to_str(UserRole::Learner), "learner");
        assert_eq!(role_to_str(UserRole::Creator), "creator");
        assert_eq!(role_to_str(UserRole::Admin), "admin");

        assert_eq!(str_to_role("learner"), UserRole::Learner);
        assert_eq!(str_to_role("creator"), UserRole::Creator);
        assert_eq!(str_to_role("admin"), UserRole::Admin);
        assert_eq!(str_to_role("unknown"), UserRole::Learner);
    }
}
