//! Creator profile repository implementations

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::creator::{ApprovalStatus, CreatorProfile, CreatorRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of CreatorRepository
#[derive(Debug, Clone)]
pub struct PostgresCreatorRepository {
    pool: PgPool,
}

impl PostgresCreatorRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PROFILE_COLUMNS: &str = "id, user_id, display_name, bio, status, \
                               created_at, updated_at, reviewed_by";

#[async_trait]
impl CreatorRepository for PostgresCreatorRepository {
    async fn get(&self, id: &str) -> Result<Option<CreatorProfile>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM creator_profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get creator profile: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorProfile>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM creator_profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to get creator profile by user: {}", e))
        })?;

        match row {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, profile: CreatorProfile) -> Result<CreatorProfile, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO creator_profiles (id, user_id, display_name, bio, status,
                                          created_at, updated_at, reviewed_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(profile.id())
        .bind(profile.user_id().as_str())
        .bind(profile.display_name())
        .bind(profile.bio())
        .bind(status_to_str(profile.status()))
        .bind(profile.created_at())
        .bind(profile.updated_at())
        .bind(profile.reviewed_by().map(|id| id.as_str().to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("duplicate key") {
                DomainError::conflict("Creator application already exists for this user")
            } else {
                DomainError::storage(format!("Failed to create creator profile: {}", e))
            }
        })?;

        Ok(profile)
    }

    async fn update(&self, profile: &CreatorProfile) -> Result<CreatorProfile, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE creator_profiles
            SET display_name = $2, bio = $3, status = $4, updated_at = $5, reviewed_by = $6
            WHERE id = $1
            "#,
        )
        .bind(profile.id())
        .bind(profile.display_name())
        .bind(profile.bio())
        .bind(status_to_str(profile.status()))
        .bind(profile.updated_at())
        .bind(profile.reviewed_by().map(|id| id.as_str().to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update creator profile: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Creator profile '{}' not found",
                profile.id()
            )));
        }

        Ok(profile.clone())
    }

    async fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<CreatorProfile>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM creator_profiles WHERE status = $1 ORDER BY created_at",
                    PROFILE_COLUMNS
                ))
                .bind(status_to_str(s))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM creator_profiles ORDER BY created_at",
                    PROFILE_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list creator profiles: {}", e)))?;

        let mut profiles = Vec::with_capacity(rows.len());

        for row in rows {
            profiles.push(row_to_profile(&row)?);
        }

        Ok(profiles)
    }
}

fn row_to_profile(row: &sqlx::postgres::PgRow) -> Result<CreatorProfile, DomainError> {
    let user_id: String = row.get("user_id");
    let status: String = row.get("status");
    let reviewed_by: Option<String> = row.get("reviewed_by");

    let user_id = UserId::new(&user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    let reviewed_by = match reviewed_by {
        Some(s) => Some(
            UserId::new(&s).map_err(|e| {
                DomainError::storage(format!("Invalid reviewer ID in database: {}", e))
            })?,
        ),
        None => None,
    };

    Ok(CreatorProfile::restore(
        row.get("id"),
        user_id,
        row.get("display_name"),
        row.get("bio"),
        str_to_status(&status)?,
        row.get("created_at"),
        row.get("updated_at"),
        reviewed_by,
    ))
}

fn status_to_str(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Pending => "pending",
        ApprovalStatus::Approved => "approved",
        ApprovalStatus::Rejected => "rejected",
    }
}

fn str_to_status(s: &str) -> Result<ApprovalStatus, DomainError> {
    match s {
        "pending" => Ok(ApprovalStatus::Pending),
        "approved" => Ok(ApprovalStatus::Approved),
        "rejected" => Ok(ApprovalStatus::Rejected),
        other => Err(DomainError::storage(format!(
            "Invalid approval status in database: {}",
            other
        ))),
    }
}

/// In-memory implementation of CreatorRepository for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryCreatorRepository {
    profiles: Arc<RwLock<HashMap<String, CreatorProfile>>>,
}

impl InMemoryCreatorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CreatorRepository for InMemoryCreatorRepository {
    async fn get(&self, id: &str) -> Result<Option<CreatorProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(id).cloned())
    }

    async fn get_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .find(|p| p.user_id() == user_id)
            .cloned())
    }

    async fn create(&self, profile: CreatorProfile) -> Result<CreatorProfile, DomainError> {
        let mut profiles = self.profiles.write().await;

        if profiles.values().any(|p| p.user_id() == profile.user_id()) {
            return Err(DomainError::conflict(
                "Creator application already exists for this user",
            ));
        }

        profiles.insert(profile.id().to_string(), profile.clone());
        Ok(profile)
    }

    async fn update(&self, profile: &CreatorProfile) -> Result<CreatorProfile, DomainError> {
        let mut profiles = self.profiles.write().await;

        if !profiles.contains_key(profile.id()) {
            return Err(DomainError::not_found(format!(
                "Creator profile '{}' not found",
                profile.id()
            )));
        }

        profiles.insert(profile.id().to_string(), profile.clone());
        Ok(profile.clone())
    }

    async fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<CreatorProfile>, DomainError> {
        let profiles = self.profiles.read().await;

        let mut result: Vec<CreatorProfile> = profiles
            .values()
            .filter(|p| status.map_or(true, |s| p.status() == s))
            .cloned()
            .collect();

        result.sort_by_key(|p| p.created_at());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_by_user() {
        let repo = InMemoryCreatorRepository::new();
        let user = UserId::generate();
        let profile = CreatorProfile::new(user.clone(), "Ada", None);

        repo.create(profile.clone()).await.unwrap();

        let found = repo.get_by_user(&user).await.unwrap();
        assert_eq!(found.unwrap().id(), profile.id());
    }

    #[tokio::test]
    async fn test_one_application_per_user() {
        let repo = InMemoryCreatorRepository::new();
        let user = UserId::generate();

        repo.create(CreatorProfile::new(user.clone(), "Ada", None))
            .await
            .unwrap();

        let result = repo.create(CreatorProfile::new(user, "Ada again", None)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let repo = InMemoryCreatorRepository::new();

        let mut approved = CreatorProfile::new(UserId::generate(), "Ada", None);
        approved.approve(UserId::generate()).unwrap();
        repo.create(approved).await.unwrap();

        repo.create(CreatorProfile::new(UserId::generate(), "Grace", None))
            .await
            .unwrap();

        let pending = repo.list(Some(ApprovalStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].display_name(), "Grace");
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert_eq!(str_to_status(status_to_str(status)).unwrap(), status);
        }
        assert!(str_to_status("bogus").is_err());
    }
}
